//! Remote storage adapter module. Implements StorageGateway for Google Drive.

pub mod credentials;
pub mod drive;

pub use credentials::ServiceAccountKey;
pub use drive::DriveStorageAdapter;
