//! 每日触发：在配置时刻执行一轮抢票
//!
//! 每次等待前回读存储，触发时刻的改动最晚隔天生效；触发落地后
//! 再整体刷新一次业务参数与 Cookie（热加载），截止时刻从实际触发
//! 时刻起算，调度延迟不压缩抢票窗口。

use std::time::Duration;

use chrono::NaiveTime;
use tracing::{error, info};

use crate::client::BookingClient;
use crate::config::AppConfig;
use crate::encode::BookingWindow;
use crate::error::BookerError;
use crate::round::{run_round, RoundConfig};
use crate::store::{CredentialStore, StoreSnapshot};

/// 存储读不出来时的重试间隔
const STORE_RETRY: Duration = Duration::from_secs(3600);

/// 解析 HH:MM 时刻
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, BookerError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| BookerError::InvalidTime(s.to_string()))
}

/// 距下一次 trigger 时刻的等待时长（今天已过则取明天）
fn until_next(trigger: NaiveTime) -> Duration {
    let now = chrono::Local::now().naive_local();
    let mut target = now.date().and_time(trigger);
    if target <= now {
        target += chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// 由存储快照与进程配置组装单轮参数
fn round_config(app: &AppConfig, snap: &StoreSnapshot) -> RoundConfig {
    RoundConfig::new(
        app.booking.base_url.clone(),
        snap.cookie.clone(),
        BookingWindow {
            begin_time: snap.begin_time.clone(),
            end_time: snap.end_time.clone(),
        },
        snap.field_count,
        Duration::from_secs(snap.window_minutes * 60),
    )
}

/// 立即执行一轮：现场刷新存储（热加载业务参数与 Cookie）后进入引擎
pub async fn run_once(app: &AppConfig, store: &CredentialStore, client: &dyn BookingClient) {
    info!("==================================================");
    info!("触发每日抢票任务");
    let snap = match store.load() {
        Ok(s) => s,
        Err(e) => {
            // 只有启动时的加载失败才致命，这里跳过当日任务
            error!("刷新配置与 Cookie 失败，跳过本轮: {}", e);
            return;
        }
    };
    let cfg = round_config(app, &snap);
    let outcome = run_round(&cfg, client).await;
    info!(outcome = ?outcome, "本轮结束");
}

/// 每日调度主循环，不返回
pub async fn run_daily(app: &AppConfig, store: &CredentialStore, client: &dyn BookingClient) {
    loop {
        let snap = match store.load() {
            Ok(s) => s,
            Err(e) => {
                error!("读取凭据存储失败，{:?} 后重试: {}", STORE_RETRY, e);
                tokio::time::sleep(STORE_RETRY).await;
                continue;
            }
        };
        let trigger = match parse_hhmm(&snap.trigger_time) {
            Ok(t) => t,
            Err(e) => {
                error!("触发时刻无法解析，{:?} 后重试: {}", STORE_RETRY, e);
                tokio::time::sleep(STORE_RETRY).await;
                continue;
            }
        };

        let wait = until_next(trigger);
        info!(
            "调度器就绪，将在每天 {} 执行抢票任务（距下次触发 {} 秒）",
            snap.trigger_time,
            wait.as_secs(),
        );
        tokio::time::sleep(wait).await;

        run_once(app, store, client).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("12:00").unwrap(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(parse_hhmm("00:05").unwrap(), NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("noon").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn test_until_next_within_a_day() {
        let wait = until_next(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert!(wait <= Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_round_config_from_snapshot() {
        let app = AppConfig::default();
        let snap: StoreSnapshot =
            serde_json::from_str(r#"{"cookie":"c=1","window_minutes":5,"field_count":8}"#).unwrap();
        let cfg = round_config(&app, &snap);
        assert_eq!(cfg.cookie, "c=1");
        assert_eq!(cfg.field_count, 8);
        assert_eq!(cfg.round_window, Duration::from_secs(300));
        assert_eq!(cfg.window.begin_time, "09:00");
        assert_eq!(cfg.window.end_time, "12:00");
    }
}
