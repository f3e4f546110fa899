//! A periodic traffic generator driven by the desim scheduler: the first
//! transmission is scheduled at a start time, and each transmission
//! reschedules the next one until the packet budget is exhausted or the
//! simulation stop time cuts it off.

use std::cell::Cell;
use std::rc::Rc;

use clap::Parser;
use desim::core::{
    units::{Microsecs, Millisecs, Nanosecs},
    Scheduler,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of packets to send
    #[arg(short, long, default_value_t = 10)]
    nr_packets: u64,

    /// Inter-packet interval in microseconds
    #[arg(short, long, default_value = "1000")]
    interval: Microsecs,

    /// Time of the first transmission, in milliseconds
    #[arg(long, default_value = "1")]
    start: Millisecs,

    /// Simulation stop time, in milliseconds
    #[arg(long, default_value = "1000")]
    stop: Millisecs,
}

#[derive(Debug, typed_builder::TypedBuilder)]
struct TrafficGen {
    interval: Nanosecs,
    nr_packets: u64,
}

impl TrafficGen {
    /// Schedules the first transmission at `start`.
    fn install(
        self: Rc<Self>,
        sched: &mut Scheduler,
        start: Nanosecs,
        sent: Rc<Cell<u64>>,
    ) -> anyhow::Result<()> {
        let gen = self;
        sched.schedule_at(start, move |s| gen.send(s, sent))?;
        Ok(())
    }

    fn send(self: Rc<Self>, sched: &mut Scheduler, sent: Rc<Cell<u64>>) {
        sent.set(sent.get() + 1);
        info!("sent packet {} at {}", sent.get(), sched.now());
        if sent.get() < self.nr_packets {
            let gen = Rc::clone(&self);
            sched
                .schedule(self.interval, move |s| gen.send(s, sent))
                .expect("interval was validated to be non-negative");
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.nr_packets > 0, "nr-packets must be positive");
    anyhow::ensure!(
        !Nanosecs::from(args.interval).is_negative(),
        "interval must be non-negative"
    );

    let gen = Rc::new(
        TrafficGen::builder()
            .interval(args.interval.into())
            .nr_packets(args.nr_packets)
            .build(),
    );

    let sent = Rc::new(Cell::new(0));
    let mut sched = Scheduler::new();
    gen.install(&mut sched, args.start.into(), Rc::clone(&sent))?;
    sched.stop_at(args.stop)?;
    let outcome = sched.run();

    println!(
        "sent {} of {} packets; clock at {} ({outcome:?})",
        sent.get(),
        args.nr_packets,
        sched.now()
    );
    sched.destroy();
    Ok(())
}
