mod ids;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use playlist::{CreatePlaylist, Playlist};
pub use track::Track;
