//! Asset loading/parsers over a read-only asset store.
//! Text (shader sources), OBJ meshes into parallel arrays, PNG images into RGBA8.

pub mod error;
pub mod mesh;
pub mod obj;
pub mod store;
pub mod texture;

pub use error::{AssetError, AssetResult};
pub use mesh::Mesh;
pub use obj::{load_obj, load_obj_from_reader, load_obj_from_str};
pub use store::{
    AssetStore, DirAssetStore, MemoryAssetStore, ZipAssetStore, read_bytes, read_text,
};
pub use texture::{ImageData, load_image};
