//! Command implementations

use tokio::net::TcpListener;

use audithub_config::Config;
use audithub_server::{AppState, shutdown_signal};
use audithub_store::{AuditListing, AuditStore};
use audithub_utils::error::AuditHubError;

/// Run the HTTP server on a current-thread runtime until interrupted.
pub(super) fn serve(config: &Config) -> Result<(), AuditHubError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| AuditHubError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let port = listener.local_addr()?.port();

        println!("Audit Hub running at http://localhost:{port}");
        println!("Serving audits from {}", config.audits_dir);
        println!("Press Ctrl+C to stop\n");
        tracing::info!(%addr, dir = %config.audits_dir, "Listening");

        let state = AppState::new(AuditStore::new(config.audits_dir.clone()));
        audithub_server::serve(listener, state, shutdown_signal()).await?;

        println!("\nStopped.");
        Ok(())
    })
}

/// Print every audit summary and exit.
pub(super) fn list(config: &Config, json: bool) -> Result<(), AuditHubError> {
    let listing = AuditStore::new(config.audits_dir.clone()).list_audits()?;

    if json {
        let rendered = serde_json::to_string_pretty(&listing).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        print!("{}", render_listing(&listing));
        for diagnostic in &listing.diagnostics {
            eprintln!("⚠ Skipped {}: {}", diagnostic.file, diagnostic.reason);
        }
    }
    Ok(())
}

/// One line per audit: slug, progress, and the individual tallies.
pub(super) fn render_listing(listing: &AuditListing) -> String {
    if listing.audits.is_empty() {
        return "No audits found\n".to_string();
    }

    let width = listing
        .audits
        .iter()
        .map(|a| a.feature.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for audit in &listing.audits {
        out.push_str(&format!(
            "{:<width$}  {:>3}/{:<3}  pass {}  fail {}  skip {}  remaining {}  {}\n",
            audit.feature,
            audit.total - audit.remaining,
            audit.total,
            audit.pass,
            audit.fail,
            audit.skip,
            audit.remaining,
            audit.title,
        ));
    }
    out
}
