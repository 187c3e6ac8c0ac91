use component_macros::Injectable;
use di_abstractions::{Injectable, TargetDescriptor};
use std::sync::Arc;

#[derive(Injectable)]
struct Clock;

#[derive(Injectable)]
#[injectable(name = "ticker")]
struct Ticker {
    #[inject(name = "clock")]
    source: Arc<Clock>,
    #[inject(skip)]
    ticks: u64,
}

fn main() {
    assert_eq!(Clock::NAME, "clock");
    assert_eq!(Ticker::NAME, "ticker");

    let descriptor = TargetDescriptor::of::<Ticker>();
    assert_eq!(descriptor.manifest().names(), vec!["clock"]);

    let ticker = Ticker {
        source: Arc::new(Clock),
        ticks: 0,
    };
    let _ = (ticker.source, ticker.ticks);
}
