mod arbeitnow;
mod mock;
mod remoteok;

pub use arbeitnow::ArbeitnowProvider;
pub use mock::MockProvider;
pub use remoteok::RemoteOkProvider;
