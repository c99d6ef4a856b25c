use tokio::signal;
use tracing::{error, warn};

use crate::services::realtime;

/// 等待 Ctrl+C；无法监听信号时永不返回，服务照常运行
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    warn!(
        "Shutdown signal received, closing {} realtime connection(s)...",
        realtime::online_count()
    );
}
