pub(crate) mod composite;
pub(crate) mod fullscreen;
pub(crate) mod pool;
pub(crate) mod target;
