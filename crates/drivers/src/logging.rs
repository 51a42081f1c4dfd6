use env_logger::{Builder, Env};

/// `RUST_LOG` wins; otherwise info for our crates with the GPU stack kept quiet.
pub fn init_logging() {
    let env = Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn");
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}
