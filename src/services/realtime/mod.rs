/*!
 * 实时变更推送
 *
 * 客户端连接 `ws://host/api/v1/realtime?token=<access_token>`，
 * 服务端在作业、评分、比赛、海报变更后推送：
 *
 * ```json
 * {"type": "change", "table": "reviews", "event": "UPDATE", "record_id": 42}
 * ```
 *
 * 作业和评分只推给作业所属学员以及在线的管理员/老师，比赛和海报推给所有人。
 * 客户端可发送 `{"type":"ping"}`，服务端回 `{"type":"pong"}`；另有 30 秒一次的协议层 ping。
 */

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use actix_ws::Message;
use dashmap::DashMap;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::authenticate_token;
use crate::models::profiles::entities::UserRole;
use crate::models::realtime::{ChangeEvent, ChangeTable, RealtimeMessage, RealtimeQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

const CHANNEL_CAPACITY: usize = 100;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

static CONNECTION_MANAGER: Lazy<ConnectionManager> = Lazy::new(ConnectionManager::new);

struct Subscriber {
    role: UserRole,
    sender: broadcast::Sender<RealtimeMessage>,
}

/// 在线连接表，同一用户的多个标签页共用一个广播通道
pub struct ConnectionManager {
    connections: DashMap<i64, Subscriber>,
}

impl ConnectionManager {
    fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn get() -> &'static Self {
        &CONNECTION_MANAGER
    }

    pub fn register(&self, user_id: i64, role: UserRole) -> broadcast::Receiver<RealtimeMessage> {
        let mut entry = self.connections.entry(user_id).or_insert_with(|| Subscriber {
            role,
            sender: broadcast::channel(CHANNEL_CAPACITY).0,
        });
        // 角色可能在两次连接之间被修改
        entry.role = role;
        entry.sender.subscribe()
    }

    /// 角色被修改后同步到在线连接，返回该用户是否在线
    pub fn update_role(&self, user_id: i64, role: UserRole) -> bool {
        match self.connections.get_mut(&user_id) {
            Some(mut entry) => {
                entry.role = role;
                true
            }
            None => false,
        }
    }

    /// 最后一个订阅者断开后才移除
    pub fn unregister(&self, user_id: i64) {
        self.connections
            .remove_if(&user_id, |_, sub| sub.sender.receiver_count() == 0);
    }

    /// 推送给作业所属学员和所有在线的管理员/老师
    pub fn send_to_owner_and_staff(&self, owner_id: i64, message: RealtimeMessage) -> usize {
        self.connections
            .iter()
            .filter(|entry| *entry.key() == owner_id || entry.role.is_staff_or_admin())
            .filter(|entry| entry.sender.send(message.clone()).is_ok())
            .count()
    }

    pub fn broadcast(&self, message: RealtimeMessage) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.sender.send(message.clone()).is_ok())
            .count()
    }

    pub fn online_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|entry| entry.sender.receiver_count() > 0)
            .count()
    }
}

/// 作业或评分变更
pub fn publish_owned_change(table: ChangeTable, event: ChangeEvent, record_id: i64, owner_id: i64) {
    let delivered = ConnectionManager::get()
        .send_to_owner_and_staff(owner_id, RealtimeMessage::change(table, event, record_id));
    debug!(
        "Published {:?} {:?} #{} to {} connection(s)",
        table, event, record_id, delivered
    );
}

/// 比赛、海报等公共数据变更
pub fn publish_public_change(table: ChangeTable, event: ChangeEvent, record_id: i64) {
    let delivered =
        ConnectionManager::get().broadcast(RealtimeMessage::change(table, event, record_id));
    debug!(
        "Published {:?} {:?} #{} to {} connection(s)",
        table, event, record_id, delivered
    );
}

/// 管理员修改角色后调用，降级的老师不再收到其他学员的作业事件
pub fn sync_subscriber_role(user_id: i64, role: UserRole) {
    if ConnectionManager::get().update_role(user_id, role) {
        debug!("Realtime role of user {} updated to {:?}", user_id, role);
    }
}

pub fn online_count() -> usize {
    ConnectionManager::get().online_count()
}

fn encode(message: &RealtimeMessage) -> Option<String> {
    serde_json::to_string(message)
        .map_err(|e| warn!("Failed to encode realtime message: {}", e))
        .ok()
}

pub struct RealtimeService;

impl RealtimeService {
    /// 握手：浏览器 WebSocket 无法带 Authorization 头，token 走 query
    pub async fn connect(
        req: HttpRequest,
        body: web::Payload,
        query: RealtimeQuery,
    ) -> ActixResult<HttpResponse> {
        let Some(token) = query.token.filter(|t| !t.is_empty()) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Missing token",
            )));
        };

        let storage = req
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .expect("Storage not found in app data")
            .get_ref()
            .clone();
        let cache = req
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone();

        let profile = match authenticate_token(&token, &storage, &cache).await {
            Ok(profile) => profile,
            Err(err) => {
                info!("Realtime handshake rejected: {}", err);
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    format!("Unauthorized: {err}"),
                )));
            }
        };

        let (response, session, stream) = actix_ws::handle(&req, body)?;
        actix_web::rt::spawn(Self::run_session(profile.id, profile.role, session, stream));
        Ok(response)
    }

    async fn run_session(
        user_id: i64,
        role: UserRole,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        info!("Realtime connected for user: {}", user_id);
        let mut rx = ConnectionManager::get().register(user_id, role);

        if let Some(json) = encode(&RealtimeMessage::Connected { user_id }) {
            let _ = session.text(json).await;
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<RealtimeMessage>(&text) {
                                Ok(RealtimeMessage::Ping) => {
                                    let Some(pong) = encode(&RealtimeMessage::Pong) else { continue };
                                    if session.text(pong).await.is_err() {
                                        break;
                                    }
                                }
                                Ok(other) => debug!("Ignoring client message from {}: {:?}", user_id, other),
                                Err(_) => debug!("Unparseable client message from {}", user_id),
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!("Realtime socket error for user {}: {:?}", user_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                msg = rx.recv() => {
                    match msg {
                        Ok(message) => {
                            if let Some(json) = encode(&message)
                                && session.text(json).await.is_err()
                            {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Realtime stream for user {} lagged by {} messages", user_id, n);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        let _ = session.close(None).await;
        ConnectionManager::get().unregister(user_id);
        info!("Realtime disconnected for user: {}", user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_changes_reach_owner_and_staff_only() {
        let manager = ConnectionManager::new();
        let mut owner = manager.register(1, UserRole::Student);
        let mut other = manager.register(2, UserRole::Student);
        let mut teacher = manager.register(3, UserRole::Staff);

        let msg = RealtimeMessage::change(ChangeTable::Reviews, ChangeEvent::Insert, 9);
        assert_eq!(manager.send_to_owner_and_staff(1, msg.clone()), 2);

        assert_eq!(owner.try_recv().unwrap(), msg);
        assert_eq!(teacher.try_recv().unwrap(), msg);
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_demoted_staff_stops_receiving_owned_changes() {
        let manager = ConnectionManager::new();
        let _owner = manager.register(1, UserRole::Student);
        let mut teacher = manager.register(3, UserRole::Staff);

        assert!(manager.update_role(3, UserRole::Student));
        assert!(!manager.update_role(99, UserRole::Staff));

        let msg = RealtimeMessage::change(ChangeTable::Submissions, ChangeEvent::Insert, 12);
        assert_eq!(manager.send_to_owner_and_staff(1, msg), 1);
        assert!(teacher.try_recv().is_err());

        // 重新提升后恢复接收
        manager.update_role(3, UserRole::Admin);
        let msg = RealtimeMessage::change(ChangeTable::Reviews, ChangeEvent::Update, 12);
        assert_eq!(manager.send_to_owner_and_staff(1, msg.clone()), 2);
        assert_eq!(teacher.try_recv().unwrap(), msg);
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let manager = ConnectionManager::new();
        let mut a = manager.register(1, UserRole::Student);
        let mut b = manager.register(2, UserRole::Admin);

        let msg = RealtimeMessage::change(ChangeTable::Posters, ChangeEvent::Update, 4);
        assert_eq!(manager.broadcast(msg.clone()), 2);
        assert_eq!(a.try_recv().unwrap(), msg);
        assert_eq!(b.try_recv().unwrap(), msg);
    }

    #[test]
    fn test_unregister_keeps_live_tabs() {
        let manager = ConnectionManager::new();
        let first = manager.register(5, UserRole::Student);
        let _second = manager.register(5, UserRole::Student);
        assert_eq!(manager.online_count(), 1);

        drop(first);
        manager.unregister(5);
        assert_eq!(manager.online_count(), 1);

        drop(_second);
        manager.unregister(5);
        assert_eq!(manager.online_count(), 0);
    }
}
