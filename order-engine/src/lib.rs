//! Order Engine - 餐厅点餐后端的定价与履约核心
//!
//! # 架构概述
//!
//! 本 crate 是点餐后端的核心引擎，提供以下功能：
//!
//! - **定价** (`pricing`): 购物车 → 价格明细（小计、运费、券、积分）
//! - **订单编排** (`orders`): 下单事务、客户解析、积分扣减、出餐完成
//! - **数据库** (`db`): SQLite 存储与仓储层
//! - **通知** (`services`): 新订单广播事件
//!
//! # 模块结构
//!
//! ```text
//! order-engine/src/
//! ├── core/          # 配置
//! ├── utils/         # 错误、日志、输入校验
//! ├── db/            # 数据库层
//! ├── pricing/       # 定价引擎
//! ├── orders/        # 订单编排与完成
//! └── services/      # 事件广播
//! ```
//!
//! HTTP/WS 传输、认证与后台 CRUD 属于外部协作方，不在本 crate 内。

pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::Config;
pub use db::DbService;
pub use orders::OrderService;
pub use pricing::PricingEngine;
pub use services::Notifier;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
