use crate::events::AppEvent;
use async_channel::Sender;
use spindle::roster::ItemLabel;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

const SOCKET_PATH: &str = "/tmp/rondel.sock";

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_command(line.trim())
                            && tx.send(event).await.is_err()
                        {
                            return;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Line protocol spoken by the `spindle` CLI. Unknown lines are dropped.
fn parse_command(line: &str) -> Option<AppEvent> {
    match line {
        "show" => Some(AppEvent::Show),
        "hide" => Some(AppEvent::Hide),
        "spin" => Some(AppEvent::Spin),
        "clear" => Some(AppEvent::Clear),
        other => {
            if let Some(name) = other.strip_prefix("add ") {
                ItemLabel::normalized(name).map(AppEvent::Add)
            } else if let Some(index) = other.strip_prefix("remove ") {
                index.trim().parse().ok().map(AppEvent::Remove)
            } else {
                None
            }
        }
    }
}
