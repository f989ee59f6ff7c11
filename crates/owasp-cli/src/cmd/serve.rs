use anyhow::Context;
use owasp_core::io::ensure_dir;
use std::path::Path;

pub fn run(root: &Path, port: u16, no_open: bool, offline: bool) -> anyhow::Result<()> {
    ensure_dir(root).with_context(|| format!("failed to create {}", root.display()))?;
    let game = super::connect(root, offline)?;

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "OWASP terminal ({}) → http://localhost:{actual_port}",
            game.backend()
        );

        tokio::select! {
            res = owasp_server::serve_on(root_buf, game, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
