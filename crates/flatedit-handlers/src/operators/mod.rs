//! Edit operators: replace / delete / insert / move / overwrite / append /
//! create / rename / delete-file.

mod file_ops;
mod locate;
mod move_text;
mod params;
mod splice;
mod text_ops;

pub use file_ops::FileOpsHandler;
pub use move_text::MoveTextHandler;
pub use text_ops::{InsertTextHandler, ReplaceDeleteHandler};
