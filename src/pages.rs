//! HTML page templates: error page, directory listing, root info page.
//!
//! The formats are fixed (see the crate-level docs); every error a request
//! can produce renders through [`error_page`], so clients always see the
//! same shape regardless of what failed.

use std::net::SocketAddr;
use std::time::SystemTime;

/// Renders the error page for a request path and a human-readable message.
pub fn error_page(path: &str, msg: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Error accessing {path}</title></head>\n\
         <body>\n\
         <h1>Error accessing {path}</h1>\n\
         <p>{msg}</p>\n\
         </body>\n\
         </html>"
    )
}

/// Renders a directory listing for `request_path`.
///
/// `entries` must already be filtered and sorted; each becomes one
/// `<li><a href="{request_path}/{entry}">{entry}</a></li>` row.
pub fn listing_page(request_path: &str, entries: &[String]) -> String {
    let items = entries
        .iter()
        .map(|entry| {
            let link = join_url(request_path, entry);
            format!("<li><a href=\"{link}\">{entry}</a></li>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<html>\n\
         <head><title>Directory listing for {request_path}</title></head>\n\
         <body>\n\
         <h2>Directory listing for {request_path}</h2>\n\
         <hr>\n\
         <ul>\n\
         {items}\n\
         </ul>\n\
         <hr>\n\
         </body>\n\
         </html>"
    )
}

/// Renders the informational page served for the literal `/` path.
pub fn root_page(peer: SocketAddr, command: &str, path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Server Info</title></head>\n\
         <body>\n\
         <h1>Server Information</h1>\n\
         <table border=\"1\">\n\
         <tr><th>Header</th><th>Value</th></tr>\n\
         <tr><td>Date and time</td><td>{date_time}</td></tr>\n\
         <tr><td>Client host</td><td>{client_host}</td></tr>\n\
         <tr><td>Client port</td><td>{client_port}</td></tr>\n\
         <tr><td>Command</td><td>{command}</td></tr>\n\
         <tr><td>Path</td><td>{path}</td></tr>\n\
         </table>\n\
         </body>\n\
         </html>",
        date_time = httpdate::fmt_http_date(SystemTime::now()),
        client_host = peer.ip(),
        client_port = peer.port(),
    )
}

/// Joins a request path and an entry name with exactly one `/` between them.
fn join_url(base: &str, entry: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{entry}")
    } else {
        format!("{base}/{entry}")
    }
}
