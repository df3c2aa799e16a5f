//! Constants shared across the crate.

/// Download endpoint for Google Drive files addressed by id.
pub const DRIVE_DOWNLOAD_URL: &str = "https://drive.google.com/uc?id=";

/// Where the cloud drive is mounted unless configured otherwise.
pub const DEFAULT_MOUNT_POINT: &str = "/content/drive";

pub const DEFAULT_PYTHON: &str = "python3";

/// Placeholder substituted with the mount point in mount command arguments.
pub const MOUNT_POINT_PLACEHOLDER: &str = "{mount_point}";

pub const DEFAULT_MOUNT_COMMAND: &[&str] = &["rclone", "mount", "gdrive:", MOUNT_POINT_PLACEHOLDER, "--daemon"];
