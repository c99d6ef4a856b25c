use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 变更所属的表
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ChangeTable {
    Submissions,
    Reviews,
    Competitions,
    Posters,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ChangeEvent {
    Insert,
    Update,
}

/// WebSocket 消息，服务端和客户端共用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum RealtimeMessage {
    /// 表数据变更
    Change {
        table: ChangeTable,
        event: ChangeEvent,
        record_id: i64,
    },
    /// 连接建立
    Connected { user_id: i64 },
    Ping,
    Pong,
}

impl RealtimeMessage {
    pub fn change(table: ChangeTable, event: ChangeEvent, record_id: i64) -> Self {
        RealtimeMessage::Change {
            table,
            event,
            record_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RealtimeQuery {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_message_shape() {
        let msg = RealtimeMessage::change(ChangeTable::Reviews, ChangeEvent::Update, 42);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "change", "table": "reviews", "event": "UPDATE", "record_id": 42})
        );
    }

    #[test]
    fn test_client_ping_parses() {
        let msg: RealtimeMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(msg, RealtimeMessage::Ping);
    }
}
