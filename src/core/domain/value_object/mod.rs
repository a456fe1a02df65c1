mod control_plane_host;
mod control_plane_port;
mod control_plane_url;
mod desired_state;
mod poll_frequency;
pub(crate) mod serde_helpers;

pub use control_plane_host::ControlPlaneHost;
pub use control_plane_port::ControlPlanePort;
pub use control_plane_url::ControlPlaneUrl;
pub use desired_state::DesiredState;
pub use poll_frequency::PollFrequency;
