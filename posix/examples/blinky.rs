//! Minimal hosted demo: one active object toggling a virtual LED.

use quark_ao::{Active, ActiveObject, StateMachine};
use quark_core::{Evt, QPriority, Signal};

const TIMEOUT: Signal = Signal::new(4);

struct Blinky {
    led_on: bool,
}

impl StateMachine for Blinky {
    fn dispatch(&mut self, e: Evt) {
        if e.sig() == TIMEOUT {
            self.led_on = !self.led_on;
            println!("LED {}", if self.led_on { "on" } else { "off" });
        }
    }
}

static BLINKY: Active<Blinky, 8> = Active::new(
    QPriority::new_unchecked(1),
    Blinky { led_on: false },
);

fn main() {
    quark_posix::init();
    quark_posix::install_console_trace();
    BLINKY.start();

    for _ in 0..6 {
        BLINKY.post(Evt::of(TIMEOUT), 0);
    }
    quark_kernel::run_until_idle();
}
