use std::{cell::Cell, rc::Rc};

use super::*;
use crate::{data::ingest::ChampionRow, encode::sink::InMemorySink};

struct CountingChart {
    id: ChartId,
    renders: Rc<Cell<u32>>,
    fail_first: bool,
}

impl Chart for CountingChart {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn render(&mut self) -> PodiumResult<()> {
        if self.fail_first {
            self.fail_first = false;
            return Err(PodiumError::render("not ready"));
        }
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }
}

fn counting(id: &str, fail_first: bool) -> (Box<dyn Chart>, Rc<Cell<u32>>) {
    let renders = Rc::new(Cell::new(0));
    let chart = CountingChart {
        id: ChartId::new(id),
        renders: Rc::clone(&renders),
        fail_first,
    };
    (Box::new(chart), renders)
}

#[test]
fn chart_renders_once_when_threshold_is_reached() {
    let mut stage = Stage::default();
    assert_eq!(stage.threshold(), 0.4);
    let (chart, renders) = counting("race", false);
    stage.register(chart).unwrap();
    let id = ChartId::new("race");

    assert_eq!(stage.on_visibility(&id, 0.1).unwrap(), Visibility::BelowThreshold);
    assert_eq!(stage.on_visibility(&id, 0.39).unwrap(), Visibility::BelowThreshold);
    assert_eq!(renders.get(), 0);

    assert_eq!(stage.on_visibility(&id, 0.4).unwrap(), Visibility::Rendered);
    assert!(stage.is_rendered(&id));
    assert_eq!(stage.on_visibility(&id, 1.0).unwrap(), Visibility::AlreadyRendered);
    assert_eq!(stage.on_visibility(&id, 0.0).unwrap(), Visibility::AlreadyRendered);
    assert_eq!(renders.get(), 1);
}

#[test]
fn charts_are_guarded_independently() {
    let mut stage = Stage::default();
    let (a, a_renders) = counting("a", false);
    let (b, b_renders) = counting("b", false);
    stage.register(a).unwrap();
    stage.register(b).unwrap();

    stage.on_visibility(&ChartId::new("a"), 0.9).unwrap();
    assert_eq!((a_renders.get(), b_renders.get()), (1, 0));
    stage.on_visibility(&ChartId::new("b"), 0.5).unwrap();
    assert_eq!((a_renders.get(), b_renders.get()), (1, 1));
}

#[test]
fn unknown_and_duplicate_charts() {
    let mut stage = Stage::default();
    let (chart, _) = counting("race", false);
    stage.register(chart).unwrap();
    let (again, _) = counting("race", false);
    assert!(matches!(stage.register(again), Err(PodiumError::Validation(_))));

    assert_eq!(
        stage.on_visibility(&ChartId::new("bump"), 1.0).unwrap(),
        Visibility::UnknownChart
    );
}

#[test]
fn failed_render_is_retried() {
    let mut stage = Stage::default();
    let (chart, renders) = counting("race", true);
    stage.register(chart).unwrap();
    let id = ChartId::new("race");

    assert!(stage.on_visibility(&id, 0.8).is_err());
    assert!(!stage.is_rendered(&id));
    assert_eq!(stage.on_visibility(&id, 0.8).unwrap(), Visibility::Rendered);
    assert_eq!(renders.get(), 1);
}

#[test]
fn threshold_must_be_a_fraction() {
    assert!(Stage::new(0.0).is_err());
    assert!(Stage::new(1.5).is_err());
    assert!(Stage::new(f64::NAN).is_err());
    assert_eq!(Stage::new(1.0).unwrap().threshold(), 1.0);
}

#[test]
fn render_once_guard_reports_first_mark() {
    let mut guard = RenderOnce::default();
    let id = ChartId::new("x");
    assert!(guard.mark(&id));
    assert!(!guard.mark(&id));
    assert!(guard.is_rendered(&id));
}

#[test]
fn race_chart_plays_into_its_sink() {
    let config = RaceConfig::default();
    let rows = vec![ChampionRow {
        year: 1958,
        constructor: "Vanwall".to_string(),
    }];
    let race = Race::from_rows(&rows, &config).unwrap();
    let mut chart = RaceChart::new(
        ChartId::new("race"),
        race,
        config,
        Theme::default(),
        FrameTiming::PerKeyframe,
        InMemorySink::new(),
    );
    assert!(chart.stats().is_none());

    chart.render().unwrap();
    assert_eq!(chart.stats().map(|s| s.frames), Some(1));
    assert_eq!(chart.sink().frames().len(), 1);
}
