mod fixtures;

use anyhow::{Context, Result};
use common::{
    ControlMode, DeathCause, Direction, EngineStatus, GameEngine, GameEvent, GameResult,
    PlannerTier, RoundConfig, find_path_to_food, legal_directions, plan_move, reachable_area,
    shortest_distance,
};
use fixtures::{assert_round_invariants, layout, pos};
use std::sync::{Arc, Mutex};

#[test]
fn test_eats_food_straight_ahead_within_five_ticks() -> Result<()> {
    let state = layout(
        20,
        20,
        &[(10, 10), (10, 11), (10, 12)],
        Direction::Up,
        &[],
        Some((10, 5)),
    );
    let mut engine = GameEngine::from_state(state, ControlMode::Autopilot, 0);

    let mut ate_at = None;
    for _ in 0..5 {
        let outcome = engine.tick()?.context("round ended early")?;
        assert_eq!(outcome.tier, Some(PlannerTier::PathToFood));
        if outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::FoodEaten { .. }))
        {
            ate_at = Some(outcome.tick);
            break;
        }
    }

    assert_eq!(ate_at, Some(5));
    assert_eq!(engine.score(), RoundConfig::default().food_reward);
    assert_eq!(engine.state().snake.length(), 4);
    Ok(())
}

#[test]
fn test_path_step_shortens_distance_by_one() -> Result<()> {
    let mut checked = 0;
    for seed in 1..=25 {
        let mut engine = GameEngine::new(RoundConfig::default(), ControlMode::Autopilot, seed, 0)?;

        for _ in 0..400 {
            let state = engine.state();
            let plan = plan_move(state);
            if plan.tier == PlannerTier::PathToFood {
                let head = *state.head()?;
                let food = state.food.context("path found without food")?;
                let before = shortest_distance(state, head, food).context("no distance")?;
                let after = shortest_distance(state, head.step(plan.direction), food)
                    .context("step left the shortest path")?;
                assert_eq!(after + 1, before, "seed {seed} tick {}", state.tick);
                checked += 1;
            }

            if engine.tick()?.is_none() {
                break;
            }
        }
    }

    assert!(checked > 100, "only {checked} path decisions were checked");
    Ok(())
}

#[test]
fn test_survival_picks_the_larger_region() -> Result<()> {
    // Row 4 is sealed by the snake and obstacles, splitting the board into a
    // 4-row top and a 5-row bottom. The food sits walled off in the top-left corner.
    let mut obstacles = vec![(0, 4), (1, 4), (2, 4), (6, 4), (7, 4), (8, 4), (9, 4)];
    obstacles.extend([(1, 0), (0, 1)]);
    let state = layout(
        10,
        10,
        &[(5, 4), (4, 4), (3, 4)],
        Direction::Right,
        &obstacles,
        Some((0, 0)),
    );

    assert_eq!(find_path_to_food(&state, pos(0, 0)), None);

    let plan = plan_move(&state);
    assert_eq!(plan.tier, PlannerTier::Survival);
    assert_eq!(plan.direction, Direction::Down);

    let chosen = reachable_area(plan.direction, &state);
    assert_eq!(chosen, 50);
    assert_eq!(reachable_area(Direction::Up, &state), 37);
    for candidate in legal_directions(&state) {
        assert!(chosen >= reachable_area(candidate, &state));
    }
    Ok(())
}

#[test]
fn test_survival_tie_goes_to_first_direction() -> Result<()> {
    // Open board, food walled in: Up, Left and Right all reach the same region.
    let state = layout(
        9,
        9,
        &[(4, 4), (4, 5), (4, 6)],
        Direction::Up,
        &[(1, 0), (0, 1)],
        Some((0, 0)),
    );
    let plan = plan_move(&state);
    assert_eq!(plan.tier, PlannerTier::Survival);
    assert_eq!(plan.direction, Direction::Up);
    Ok(())
}

#[test]
fn test_pocket_is_entered_then_fatal() -> Result<()> {
    // 8x3 board. Rows 0 and 2 are solid except the pocket corner (0, 0); the
    // pocket is (2,1) (1,1) (0,1) (0,0). The food on the right is only
    // reachable through the snake's own body.
    let mut obstacles = Vec::new();
    for x in 0..8 {
        if x != 0 {
            obstacles.push((x, 0));
        }
        obstacles.push((x, 2));
    }
    let state = layout(
        8,
        3,
        &[(3, 1), (4, 1), (5, 1)],
        Direction::Left,
        &obstacles,
        Some((7, 1)),
    );

    assert_eq!(legal_directions(&state), vec![Direction::Left]);
    let plan = plan_move(&state);
    assert_eq!(plan.tier, PlannerTier::Survival);
    assert_eq!(plan.direction, Direction::Left);
    assert_eq!(reachable_area(Direction::Left, &state), 4);

    let results = Arc::new(Mutex::new(Vec::<GameResult>::new()));
    let mut engine =
        GameEngine::from_state(state, ControlMode::Autopilot, 0).with_result_sink(results.clone());

    let mut tiers = Vec::new();
    let mut death = None;
    while let Some(outcome) = engine.tick()? {
        assert_round_invariants(engine.state());
        tiers.extend(outcome.tier);
        for event in &outcome.events {
            if let GameEvent::SnakeDied { cause } = event {
                death = Some(*cause);
            }
        }
    }

    // Four moves fill the pocket, the fifth tick has nowhere to go.
    assert_eq!(tiers.len(), 5);
    assert!(!tiers.contains(&PlannerTier::PathToFood));
    assert_eq!(tiers.last(), Some(&PlannerTier::HoldDirection));
    assert_eq!(death, Some(DeathCause::Wall));
    assert_eq!(engine.status(), EngineStatus::Finished);

    let results = results.lock().map_err(|_| anyhow::anyhow!("poisoned"))?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 0);
    Ok(())
}
