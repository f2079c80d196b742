//! Entry point for anchor-inspect.
//! Loads assets from a directory or a packaged bundle and prints pose math.

use anyhow::{Context, Result, bail};
use asset::{AssetStore, DirAssetStore, ZipAssetStore};
use corelib::{Pose, Quat, TransformMatrix, Vec3, log_4x4_matrix, signed_distance};

#[derive(Debug)]
struct Args {
    assets: String,
    mesh: Option<String>,
    texture: Option<String>,
    pose: Option<Pose>,
    plane: Option<Pose>,
}

fn parse_args() -> Result<Args> {
    // Accept: --assets=<dir|.zip|.apk> --mesh=<path> --texture=<path>
    //         --pose=tx,ty,tz[,qx,qy,qz,qw] --plane=tx,ty,tz[,qx,qy,qz,qw]
    let mut args = Args {
        assets: "assets".to_owned(),
        mesh: None,
        texture: None,
        pose: None,
        plane: None,
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--assets=") {
            args.assets = v.to_owned();
        } else if let Some(v) = arg.strip_prefix("--mesh=") {
            args.mesh = Some(v.to_owned());
        } else if let Some(v) = arg.strip_prefix("--texture=") {
            args.texture = Some(v.to_owned());
        } else if let Some(v) = arg.strip_prefix("--pose=") {
            args.pose = Some(parse_pose(v).context("Invalid --pose")?);
        } else if let Some(v) = arg.strip_prefix("--plane=") {
            args.plane = Some(parse_pose(v).context("Invalid --plane")?);
        } else {
            log::warn!("Ignoring unknown argument '{}'", arg);
        }
    }
    Ok(args)
}

fn parse_pose(value: &str) -> Result<Pose> {
    let parts = value
        .split(',')
        .map(|s| s.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("'{}' is not a list of numbers", value))?;
    match parts.as_slice() {
        [tx, ty, tz] => Ok(Pose::from_translation(Vec3::new(*tx, *ty, *tz))),
        [tx, ty, tz, qx, qy, qz, qw] => {
            let q = Quat::from_xyzw(*qx, *qy, *qz, *qw);
            if q.length_squared() == 0.0 {
                bail!("orientation quaternion is zero");
            }
            Ok(Pose::new(Vec3::new(*tx, *ty, *tz), q.normalize()))
        }
        _ => bail!("expected 3 or 7 numbers, got {}", parts.len()),
    }
}

fn open_store(path: &str) -> Result<Box<dyn AssetStore>> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".apk") {
        let store = ZipAssetStore::open_file(path)
            .with_context(|| format!("Failed to open package {}", path))?;
        Ok(Box::new(store.with_root("assets")))
    } else if lower.ends_with(".zip") {
        let store = ZipAssetStore::open_file(path)
            .with_context(|| format!("Failed to open bundle {}", path))?;
        Ok(Box::new(store))
    } else {
        Ok(Box::new(DirAssetStore::new(path)))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    log::info!("Starting anchor-inspect. Assets: {}", args.assets);
    let store = open_store(&args.assets)?;

    if let Some(path) = &args.mesh {
        let mesh = asset::load_obj(store.as_ref(), path)
            .with_context(|| format!("Failed to load mesh {}", path))?;
        log::info!(
            "Mesh {}: {} vertices, {} triangles, normals={}, uvs={}",
            path,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.has_normals(),
            mesh.has_uvs()
        );
    }

    if let Some(path) = &args.texture {
        let image = asset::load_image(store.as_ref(), path)
            .with_context(|| format!("Failed to load texture {}", path))?;
        log::info!("Texture {}: {}x{} RGBA8", path, image.width, image.height);
    }

    if let Some(pose) = args.pose {
        let model = TransformMatrix::from_pose(&pose);
        log::info!("Model matrix (row-major):");
        log_4x4_matrix(model.as_array());

        if let Some(plane) = args.plane {
            log::info!(
                "Distance to plane: {:.3}",
                signed_distance(&plane, &pose)
            );
        }
    } else if args.plane.is_some() {
        log::warn!("--plane needs --pose for the camera; skipping distance");
    }

    log::info!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_from_translation_only() {
        let pose = parse_pose("0, 5, 0").unwrap();
        assert_eq!(pose, Pose::from_translation(Vec3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn pose_orientation_is_normalized() {
        let pose = parse_pose("1,2,3,0,0,0,2").unwrap();
        assert_eq!(pose.orientation, Quat::IDENTITY);
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bad_poses_are_rejected() {
        assert!(parse_pose("1,2").is_err());
        assert!(parse_pose("1,2,x").is_err());
        assert!(parse_pose("0,0,0,0,0,0,0").is_err());
    }
}
