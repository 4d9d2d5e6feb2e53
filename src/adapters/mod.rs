//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter | Implements | Connects to                  |
//! |---------|------------|------------------------------|
//! | `i2c`   | Bus        | any `embedded-hal` 1.0 I2C   |

pub mod i2c;
