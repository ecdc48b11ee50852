//! Background scheduled tasks for the application.
//!
//! The wheel itself spawns nothing; the only recurring job removes pending
//! redemptions whose TTL has passed. Call `spawn_all` once during startup.

use crate::services::RedemptionService;
use chrono::Utc;

/// Spawn all background tasks.
///
/// Detaches via `tokio::spawn`; it does not block.
pub fn spawn_all(redemption_service: RedemptionService, purge_interval_secs: u64) {
    // 过期待兑现奖品清理
    {
        let svc = redemption_service.clone();
        let interval = std::time::Duration::from_secs(purge_interval_secs.max(60));
        tokio::spawn(async move {
            loop {
                match svc.purge_expired(Utc::now()).await {
                    Ok(n) if n > 0 => log::info!("Expired pending redemptions purged: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to purge pending redemptions: {e:?}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }
}
