/// 引擎配置 - 所有可调参数
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | ./data/orders.db | SQLite 数据库文件路径 |
/// | EXPRESS_DELIVERY_FEE | 15000 | 快速配送附加费（货币单位） |
/// | POINT_REDEEM_RATE | 500 | 1 积分抵扣的货币单位 |
/// | POINT_EARN_RATE | 10000 | 每消费多少货币单位积 1 分 |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 通知广播通道容量 |
/// | LOG_LEVEL | info | 日志级别 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/orders.db EXPRESS_DELIVERY_FEE=20000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 快速配送（EXPRESS）附加费，其他配送方式不收费
    pub express_delivery_fee: i64,
    /// 积分抵扣汇率：1 积分 = N 货币单位
    pub point_redeem_rate: i64,
    /// 积分累计汇率：消费 N 货币单位 = 1 积分
    ///
    /// 与 point_redeem_rate 故意不对称（默认 20:1），是会员体系的利润空间
    pub point_earn_rate: i64,
    /// 通知广播通道容量
    pub event_channel_capacity: usize,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/orders.db".into()),
            express_delivery_fee: std::env::var("EXPRESS_DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15000),
            point_redeem_rate: std::env::var("POINT_REDEEM_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            point_earn_rate: std::env::var("POINT_EARN_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// 使用自定义数据库路径覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_database_path(db_path: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.database_path = db_path.into();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
