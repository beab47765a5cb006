use anyhow::Result;
use dashboard_core::common::Pose;
use dashboard_core::config::DashboardConfig;
use dashboard_core::DashboardCore;
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generator_node=info".parse()?)
                .add_directive("dashboard_core=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = if args.len() > 1 {
        let path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", path);
        DashboardConfig::load(path)?
    } else {
        DashboardConfig::default()
    };

    let core = DashboardCore::new(config);
    info!("Dashboard core initialized");
    log_current(&core);

    // Scripted edit sequence standing in for the dashboard UI
    let store = core.store();

    info!("Appending a waypoint behind the far switch");
    store.push_waypoint(Pose::from_degrees(13.5, 4.0, -45.0));
    log_current(&core);

    info!("Enabling auto path finding");
    store.set_auto_path_finding(true);
    log_current(&core);

    info!("Reversing the path");
    store.set_reversed(true);
    log_current(&core);

    info!("Tightening the velocity envelope");
    store.set_max_velocity(1.5);
    store.set_max_acceleration(1.0);
    log_current(&core);

    if let Some(trajectory) = core.current_trajectory() {
        info!("Final course:");
        for point in core.sampler().sample_points(&trajectory).step_by(50) {
            info!("  t={:.2}s  {}", point.time, point.tooltip());
        }
    }

    Ok(())
}

fn log_current(core: &DashboardCore) {
    match core.current_trajectory() {
        Some(trajectory) => info!(
            "Current trajectory: {} states, {:.2} s, {} waypoint(s)",
            trajectory.len(),
            trajectory.total_time(),
            core.store().waypoint_count()
        ),
        None => warn!("No trajectory published"),
    }
}
