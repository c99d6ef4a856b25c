//! ArtClub - 美术社团后端服务
//!
//! 基于 Actix Web 构建：教程视频、作业提交与评分、比赛、首页海报、学习统计。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），用于认证后的用户资料
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色与限流中间件
//! - `models`: 数据模型定义
//! - `object_store`: 对象存储（头像、作业、教程视频、海报）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod object_store;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
