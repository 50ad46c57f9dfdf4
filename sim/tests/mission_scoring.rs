use std::time::Duration;

use flight::Vec3f;
use sim::mission::{CargoStatus, MissionError, MissionManager, TaskStatus};
use sim::tasks;

fn fly_planned_profile(mm: &mut MissionManager, secs: u64) {
    let cruise = Vec3f::new(0.0, 0.0, 10.0);
    let profile = [
        (Vec3f::new(0.0, 0.0, 0.0), Vec3f::ZERO),
        (Vec3f::new(0.0, 50.0, 0.0), Vec3f::ZERO),
        (Vec3f::new(0.0, 50.0, 320.0), cruise),
        (Vec3f::new(0.0, 0.0, 320.0), Vec3f::ZERO),
    ];
    for (i, (p, v)) in profile.into_iter().enumerate() {
        let t = Duration::from_secs(secs * i as u64 / 3);
        let ended = mm.update_progress(p, v, t).expect("task active");
        assert!(ended.is_none(), "well inside the time limit");
    }
}

#[test]
fn clean_emergency_run_scores_high() {
    let mut mm = MissionManager::default();
    mm.start_task(tasks::emergency());
    fly_planned_profile(&mut mm, 60);

    let r = mm.complete_task(1.0).expect("active task");
    assert_eq!(r.status, TaskStatus::Completed);
    assert_eq!(r.scores.heading, 10, "flew exactly the planned profile");
    assert_eq!(r.scores.height, 10);
    assert_eq!(r.scores.speed, 15);
    assert_eq!(r.scores.obstacle, 15);
    assert_eq!(r.scores.time, 20);
    assert_eq!(r.scores.landing, 15);
    assert_eq!(r.scores.cargo, 15);
    assert_eq!(r.total_score, 100);
    assert_eq!(r.stars, 5);
    assert!((r.flight_distance_km - 0.42).abs() < 1e-4);
    assert_eq!(mm.history().len(), 1);
}

#[test]
fn collisions_cost_points_and_damage_fragile_cargo() {
    let mut mm = MissionManager::default();
    mm.start_task(tasks::emergency());
    fly_planned_profile(&mut mm, 60);
    assert_eq!(mm.record_collision(), Ok(1));
    assert_eq!(mm.progress().map(|p| p.cargo_status), Some(CargoStatus::Damaged));
    assert_eq!(mm.record_collision(), Ok(2));

    let r = mm.complete_task(1.0).expect("active task");
    assert_eq!(r.scores.obstacle, 5);
    assert_eq!(r.scores.cargo, 8);
    assert_eq!(r.total_score, 83);
    assert_eq!(r.stars, 4);
    assert!(r.success);
}

#[test]
fn obstacle_score_floors_at_zero() {
    let mut mm = MissionManager::default();
    mm.start_task(tasks::city_easy());
    for _ in 0..5 {
        mm.record_collision().expect("active task");
    }
    let r = mm.complete_task(0.0).expect("active task");
    assert_eq!(r.scores.obstacle, 0);
    assert_eq!(r.cargo_status, CargoStatus::Safe, "books are not fragile");
}

#[test]
fn overrunning_the_time_limit_fails_the_task() {
    let mut mm = MissionManager::default();
    mm.start_task(tasks::city_easy());
    let ok = mm.update_progress(Vec3f::ZERO, Vec3f::ZERO, Duration::from_secs(300));
    assert_eq!(ok, Ok(None), "exactly at the limit is still fine");

    let ended = mm
        .update_progress(Vec3f::ZERO, Vec3f::ZERO, Duration::from_secs_f32(300.5))
        .expect("task active")
        .expect("limit exceeded");
    assert_eq!(ended.status, TaskStatus::Failed);
    assert!(!ended.success);
    assert_eq!(ended.stars, 1);
    assert_eq!(ended.failure_reason.as_deref(), Some("time limit exceeded"));

    assert_eq!(mm.record_collision(), Err(MissionError::NoActiveTask));
    assert_eq!(mm.complete_task(1.0).map(|r| r.total_score), Err(MissionError::NoActiveTask));
}

#[test]
fn slow_finish_scores_fewer_time_points() {
    let mut mm = MissionManager::default();
    mm.start_task(tasks::emergency());
    fly_planned_profile(&mut mm, 170);
    let r = mm.complete_task(0.5).expect("active task");
    assert_eq!(r.scores.time, 12);
    assert_eq!(r.scores.landing, 8);
}
