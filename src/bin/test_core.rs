use dashboard_core::common::Pose;
use dashboard_core::DashboardCore;

fn main() {
    println!("Initializing dashboard core...");

    let core = DashboardCore::default();

    match core.current_trajectory() {
        Some(trajectory) => println!(
            "Seed trajectory: {} states, {:.2} s",
            trajectory.len(),
            trajectory.total_time()
        ),
        None => {
            println!("No trajectory published for the seed waypoints");
            return;
        }
    }

    // Simulate a dashboard edit: pull the second waypoint further out
    let store = core.store();
    store.replace_waypoint(1, Pose::from_degrees(6.0, 5.0, 90.0));
    store.set_max_velocity(2.0);

    let trajectory = match core.current_trajectory() {
        Some(trajectory) => trajectory,
        None => {
            println!("Recompute did not publish a trajectory");
            return;
        }
    };

    println!(
        "Edited trajectory: {} states, {:.2} s",
        trajectory.len(),
        trajectory.total_time()
    );

    let sampler = core.sampler();
    for point in sampler.sample_points(&trajectory).step_by(25) {
        println!("t={:.2}s  {}", point.time, point.tooltip());
    }

    println!("Done.");
}
