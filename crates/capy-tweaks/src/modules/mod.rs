//! The smaller tweaks. Each one is a [`Module`](crate::registry::Module)
//! bound to a single boolean key.

mod click_to_close_overview;
mod favorite_notifications;
mod window_attention;
mod workspace_wraparound;

pub use click_to_close_overview::ClickToCloseOverview;
pub use favorite_notifications::FavoriteNotifications;
pub use window_attention::WindowAttention;
pub use workspace_wraparound::{
    ClampedNeighbors, Direction, NeighborStrategy, WorkspaceNavigator, WorkspaceWraparound,
    WraparoundNeighbors,
};
