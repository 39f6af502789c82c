mod board;
mod error;
mod index;
mod kifu;
pub mod mylog;
mod notation;
mod shogi;
mod step;

pub use self::board::*;
pub use self::error::*;
pub use self::index::*;
pub use self::kifu::*;
pub use self::notation::*;
pub use self::shogi::*;
pub use self::step::*;
