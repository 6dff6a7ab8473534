//! 抢票轮次引擎：限定窗口内对全部场地逐个轮询
//!
//! 单轮内严格串行：端点本就拥挤，自我并发只会加重限速。
//! 状态机：Running -> Success / Exhausted / TimedOut / CredentialInvalid。
//! 截止时刻在每次扫场前与每次尝试前各检查一次。

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::classify::{classify, AttemptOutcome};
use crate::client::BookingClient;
use crate::encode::{booking_url, BookingWindow};
use crate::fields::{field_name, field_no, UNKNOWN_FIELD};

/// 命中限速后的冷却时长
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(3);
/// 普通失败的重试间隔
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// 单轮的不可变参数快照。每轮开始时从凭据存储整体读出，
/// 轮内不再回读，避免参数被外部改写时读到一半新一半旧。
#[derive(Debug, Clone)]
pub struct RoundConfig {
    pub base_url: String,
    /// 会话凭据，内容对引擎不透明
    pub cookie: String,
    /// 要预订的时段
    pub window: BookingWindow,
    pub field_count: u32,
    /// 抢票窗口时长，从触发时刻起算
    pub round_window: Duration,
    pub rate_limit_cooldown: Duration,
    pub retry_delay: Duration,
}

impl RoundConfig {
    pub fn new(
        base_url: String,
        cookie: String,
        window: BookingWindow,
        field_count: u32,
        round_window: Duration,
    ) -> Self {
        Self {
            base_url,
            cookie,
            window,
            field_count,
            round_window,
            rate_limit_cooldown: RATE_LIMIT_COOLDOWN,
            retry_delay: RETRY_DELAY,
        }
    }
}

/// 轮内单个场地的状态。每轮重建，跳过标记不跨轮保留。
#[derive(Debug)]
struct FieldState {
    no: String,
    name: String,
    skipped: bool,
}

/// 一轮的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// 抢到一块场地（每轮至多一次成功）
    Success { field_no: String, field_name: String },
    /// 所有场地都已被抢走
    Exhausted,
    /// 抢票窗口耗尽
    TimedOut,
    /// Cookie 失效，本轮终止，等新 Cookie 到达后的下一次触发
    CredentialInvalid,
}

/// 执行一轮抢票。截止时刻从调用时刻起算，触发延迟不压缩窗口。
pub async fn run_round(cfg: &RoundConfig, client: &dyn BookingClient) -> RoundOutcome {
    let deadline = Instant::now() + cfg.round_window;
    let mut fields: Vec<FieldState> = (1..=cfg.field_count)
        .map(|i| {
            let no = field_no(i);
            let name = field_name(&no);
            FieldState { no, name, skipped: false }
        })
        .collect();

    loop {
        if Instant::now() >= deadline {
            info!("抢票时间窗口已过，今日任务结束");
            return RoundOutcome::TimedOut;
        }
        if fields.iter().all(|f| f.skipped) {
            info!("所有场地都已被抢完，今日任务结束");
            return RoundOutcome::Exhausted;
        }

        for idx in 0..fields.len() {
            if fields[idx].skipped {
                continue;
            }
            if Instant::now() >= deadline {
                info!("抢票时间窗口已过，今日任务结束");
                return RoundOutcome::TimedOut;
            }

            match attempt_field(cfg, client, &fields[idx]).await {
                AttemptOutcome::Success => {
                    info!(field = %fields[idx].name, "🎉 抢票成功，今日任务结束");
                    return RoundOutcome::Success {
                        field_no: fields[idx].no.clone(),
                        field_name: fields[idx].name.clone(),
                    };
                }
                AttemptOutcome::CredentialInvalid => {
                    warn!("Cookie 已失效（响应为登录页），终止本轮，请更新 Cookie");
                    return RoundOutcome::CredentialInvalid;
                }
                AttemptOutcome::AlreadyTaken => {
                    info!(field = %fields[idx].name, "已被其他人抢走，本轮跳过");
                    fields[idx].skipped = true;
                }
                AttemptOutcome::RateLimited => {
                    warn!("服务端限速，冷却 {:?} 后继续", cfg.rate_limit_cooldown);
                    sleep(cfg.rate_limit_cooldown).await;
                }
                AttemptOutcome::TransientRetry
                | AttemptOutcome::NetworkError
                | AttemptOutcome::DecodeError => {
                    sleep(cfg.retry_delay).await;
                }
            }
        }
    }
}

/// 对单个场地发起一次尝试并判读
async fn attempt_field(
    cfg: &RoundConfig,
    client: &dyn BookingClient,
    field: &FieldState,
) -> AttemptOutcome {
    if field.name == UNKNOWN_FIELD {
        warn!(no = %field.no, "场地编号无法解析，仍发起请求，由服务端裁决");
    }
    let url = booking_url(&cfg.base_url, &field.no, &field.name, &cfg.window);
    match client.send(&url, &cfg.cookie).await {
        Ok(resp) => {
            let outcome = classify(resp.status, &resp.body);
            info!(field = %field.name, status = resp.status, outcome = ?outcome, "尝试完成");
            outcome
        }
        Err(e) => {
            warn!(field = %field.name, "请求失败: {}", e);
            AttemptOutcome::NetworkError
        }
    }
}
