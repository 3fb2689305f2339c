pub use peerdrop_core::model::{ApplicationMessage, FileMeta, PeerId, RoomId};

pub mod model {
    pub use peerdrop_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use peerdrop_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use peerdrop_client::*;
}
