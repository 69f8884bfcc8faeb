use log::{debug, error};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write side of a control connection, shared with every command handler.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Formats a reply line: `<code> <text>\r\n`.
pub fn format_reply(code: u16, text: &str) -> String {
    format!("{} {}\r\n", code, text)
}

/// Sends a raw response to the client.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    if let Err(e) = writer.write_all(message).await {
        error!("Failed to send response: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Sends one numbered reply to the client.
pub async fn send_reply(writer: &ControlWriter, code: u16, text: &str) -> Result<(), std::io::Error> {
    debug!("--> {} {}", code, text);
    send_response(writer, format_reply(code, text).as_bytes()).await
}

/// Splits a command line into its upper-cased verb and the rest of the line.
pub fn split_command(line: &str) -> (String, String) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb.to_ascii_uppercase(), rest.trim_start().to_string()),
        None => (line.to_ascii_uppercase(), String::new()),
    }
}

/// Quotes a pathname for 257 replies, doubling embedded quotes.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reply() {
        assert_eq!(format_reply(220, "Service ready."), "220 Service ready.\r\n");
        assert_eq!(format_reply(213, "0"), "213 0\r\n");
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("user bob\r\n"), ("USER".into(), "bob".into()));
        assert_eq!(split_command("PWD\r\n"), ("PWD".into(), String::new()));
        assert_eq!(
            split_command("STOR  my file.txt  \r\n"),
            ("STOR".into(), "my file.txt".into())
        );
        assert_eq!(split_command("   \r\n"), (String::new(), String::new()));
    }

    #[test]
    fn test_quote_path() {
        assert_eq!(quote_path("/a/b"), "\"/a/b\"");
        assert_eq!(quote_path("/say \"hi\""), "\"/say \"\"hi\"\"\"");
    }
}
