//! Mining preset against the bundled gem mine.

mod common;

use std::sync::Arc;

use bot_content::ContentFactory;
use bot_core::{
    ActionKind, Area, BotProfile, Landmark, ManualClock, NodeId, Position, ResourceNode, Site,
    Timestamp,
};
use bot_runtime::tasks::Mine;
use bot_runtime::{
    BotContext, NullSink, RunSummary, Runtime, RuntimeConfig, RuntimeError, SimWorld, StopReason,
    TaskList, presets,
};
use common::{Script, StubEnv, open_script};

const NODE_A: Position = Position::ground(10, 10);
const NODE_B: Position = Position::ground(12, 10);
const AREA_CENTER: Position = Position::ground(15, 10);

fn gem_profile() -> BotProfile {
    ContentFactory::bundled().load_profile("gem_mine").unwrap()
}

fn run_mine(ticks: u64, prepare: impl FnOnce(&mut SimWorld)) -> RunSummary {
    let profile = gem_profile();
    let scenario = ContentFactory::bundled().load_scenario("gem_mine").unwrap();

    let clock = ManualClock::new();
    let mut world = SimWorld::new(scenario, clock.clone());
    prepare(&mut world);

    let tasks = presets::mining(&profile);
    let context = BotContext::new(profile, Box::new(world), Arc::new(clock), Some(5)).unwrap();
    Runtime::builder()
        .config(RuntimeConfig {
            max_ticks: Some(ticks),
            ..RuntimeConfig::default()
        })
        .tasks(tasks)
        .sink(NullSink)
        .build(context)
        .unwrap()
        .run()
        .unwrap()
}

#[test]
fn mines_and_hops_away_from_the_crowd() {
    let summary = run_mine(300, |_| {});
    let counters = summary.diagnostics.counters;

    assert!(!summary.stopped(), "unexpected stop: {:?}", summary.stop_reason);
    assert!(counters.nodes_worked > 0);
    assert!(counters.relocations >= 1);
    assert!(counters.crowd_detections >= 1);
}

#[test]
fn failed_relocation_stops_the_run() {
    let summary = run_mine(300, SimWorld::disable_relocation);

    let reason = summary.stop_reason.expect("run should stop");
    assert!(reason.starts_with("relocation failed"), "{reason}");
    assert!(summary.ticks < 300);
    assert_eq!(summary.diagnostics.counters.relocations, 0);
}

#[test]
fn blind_client_fails_setup() {
    let summary = run_mine(50, |world| world.blind_until(Timestamp(60_000)));

    assert_eq!(summary.ticks, 1);
    assert_eq!(
        summary.stop_reason,
        Some(StopReason::NoSelfPosition { attempts: 3 }.to_string())
    );
}

#[test]
fn unreadable_perception_idles_without_stopping() {
    let clock = ManualClock::new();
    let mut script = open_script(Position::ground(2838, 9388));
    script.nodes = Some(vec![]);
    let env = StubEnv::new(clock.clone(), script);

    let profile = gem_profile();
    let tasks = presets::mining(&profile);
    let context =
        BotContext::new(profile, Box::new(env.clone()), Arc::new(clock.clone()), Some(1)).unwrap();
    let mut runtime = Runtime::builder()
        .tasks(tasks)
        .sink(NullSink)
        .build(context)
        .unwrap();

    assert_eq!(runtime.step().unwrap().task_name(), Some("setup"));

    {
        let mut script = env.script();
        script.self_position = None;
        script.threats = None;
        script.nodes = None;
        script.respawn = None;
        script.others = None;
    }
    for _ in 0..3 {
        assert!(runtime.step().unwrap().is_idle());
    }

    let diagnostics = runtime.context().diagnostics();
    assert_eq!(diagnostics.counters.idle_ticks, 3);
    assert_eq!(diagnostics.stop_reason, None);
    assert!(env.script().interactions.is_empty());
}

#[test]
fn stopped_runtime_refuses_further_ticks() {
    let clock = ManualClock::new();
    let mut script = open_script(Position::ground(0, 0));
    script.self_position = None;
    let env = StubEnv::new(clock.clone(), script);

    let profile = gem_profile();
    let tasks = presets::mining(&profile);
    let context = BotContext::new(profile, Box::new(env), Arc::new(clock), None).unwrap();
    let mut runtime = Runtime::builder().tasks(tasks).build(context).unwrap();

    let err = runtime.step().unwrap_err();
    assert!(matches!(
        err.stop_reason(),
        Some(StopReason::NoSelfPosition { .. })
    ));
    assert!(matches!(runtime.step(), Err(RuntimeError::Stopped { .. })));
}

#[test]
fn empty_task_list_is_rejected() {
    let clock = ManualClock::new();
    let env = StubEnv::new(clock.clone(), open_script(Position::ground(0, 0)));
    let context =
        BotContext::new(gem_profile(), Box::new(env), Arc::new(clock), Some(1)).unwrap();
    assert!(matches!(
        Runtime::builder().build(context),
        Err(RuntimeError::NoTasks)
    ));
}

fn pit_profile() -> BotProfile {
    let mut profile = BotProfile::new("pit", ActionKind::Mine).with_landmark(
        Landmark::WorkArea,
        Site::Area(Area::from_corners(Position::ground(0, 0), Position::ground(30, 20))),
    );
    profile.retry.interaction_failures = 2;
    profile
}

/// Runtime with `Mine` as the only task, standing next to two nodes.
fn pit_runtime(profile: BotProfile, edit: impl FnOnce(&mut Script)) -> (Runtime, StubEnv) {
    let clock = ManualClock::new();
    let mut script = open_script(Position::ground(9, 10));
    script.nodes = Some(vec![ResourceNode::new(1, NODE_A), ResourceNode::new(2, NODE_B)]);
    edit(&mut script);
    let env = StubEnv::new(clock.clone(), script);

    let tasks: TaskList = vec![Box::new(Mine::new(&profile))];
    let context =
        BotContext::new(profile, Box::new(env.clone()), Arc::new(clock), Some(9)).unwrap();
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            max_ticks: Some(50),
            ..RuntimeConfig::default()
        })
        .tasks(tasks)
        .sink(NullSink)
        .build(context)
        .unwrap();
    (runtime, env)
}

#[test]
fn failed_attempt_claims_the_node() {
    let (mut runtime, env) = pit_runtime(pit_profile(), |script| {
        script.interact_result = false;
        script.deplete_on_interact = false;
    });

    runtime.step().unwrap();
    let now = runtime.context().now();
    assert!(!runtime.context().blacklist().is_available(NODE_A, now));
    assert_eq!(runtime.context().counters().interaction_failures, 1);
    assert_eq!(runtime.context().target_hint(), None);

    runtime.step().unwrap();
    assert_eq!(
        env.script().interactions,
        vec![(NodeId(1), ActionKind::Mine), (NodeId(2), ActionKind::Mine)]
    );
}

#[test]
fn repeated_failures_rewalk_to_area_center() {
    let (mut runtime, env) = pit_runtime(pit_profile(), |_| {});

    // A lands and starts respawning
    runtime.step().unwrap();
    assert_eq!(runtime.context().target_hint(), Some(NODE_A));

    {
        let mut script = env.script();
        script.interact_result = false;
        script.deplete_on_interact = false;
    }
    runtime.step().unwrap();
    assert_eq!(runtime.context().counters().escalations, 0);
    assert!(env.script().walks.is_empty());

    runtime.step().unwrap();
    let counters = *runtime.context().counters();
    assert_eq!(counters.interaction_failures, 2);
    assert_eq!(counters.escalations, 1);
    assert_eq!(env.script().walks, vec![AREA_CENTER]);
    assert_eq!(runtime.context().target_hint(), None);
}

#[test]
fn no_progress_ends_the_run_as_stuck() {
    let mut profile = pit_profile();
    profile.stuck_timeout_ms = 5_000;
    let (mut runtime, _env) = pit_runtime(profile, |script| {
        script.interact_result = false;
        script.deplete_on_interact = false;
    });

    let summary = runtime.run().unwrap();
    let reason = summary.stop_reason.expect("run should stop");
    assert!(reason.starts_with("no node worked"), "{reason}");
    assert!(summary.ticks < 50);
    assert_eq!(summary.diagnostics.counters.nodes_worked, 0);
}

#[test]
fn visibly_respawned_node_is_released_early() {
    let (mut runtime, env) = pit_runtime(pit_profile(), |_| {});

    runtime.step().unwrap();
    runtime.step().unwrap();
    assert_eq!(env.script().respawn, Some(vec![NODE_A, NODE_B]));
    assert_eq!(runtime.context().counters().early_releases, 0);

    // A respawns well inside the blacklist window
    env.script().respawn = Some(vec![NODE_B]);
    runtime.step().unwrap();

    assert_eq!(runtime.context().counters().early_releases, 1);
    assert_eq!(env.script().interactions.last(), Some(&(NodeId(1), ActionKind::Mine)));
    assert!(runtime.context().now() < Timestamp(22_000));
}
