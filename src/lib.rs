//! # presales-gantt
//!
//! Business-calendar-aware timeline layout for presales project plans.
//!
//! Phases are positioned in business days from a project start date. The
//! [`calendar`] module turns those offsets into real dates over weekends
//! and a caller-supplied holiday list; the [`layout`] module turns them
//! into pixel rows, dependency curves and canvas bounds for a zoom level.
//!
//! ```
//! use presales_gantt::calendar::HolidaySet;
//! use presales_gantt::layout::TimelineEngine;
//! use presales_gantt::model::{Phase, ViewMode};
//!
//! let phases = vec![
//!     Phase::new("disc", "Discovery", 0, 4),
//!     Phase::new("design", "Design", 4, 6).after("disc"),
//! ];
//! let holidays: HolidaySet = ["2025-01-08"].into_iter().collect();
//! let layout = TimelineEngine::default()
//!     .layout("2025-01-06", &phases, &holidays, ViewMode::Week)
//!     .unwrap();
//!
//! assert_eq!(layout.rows[0].end_date, "2025-01-13");
//! assert_eq!(layout.links.len(), 1);
//! ```

pub mod calendar;
pub mod io;
pub mod layout;
pub mod logging;
pub mod model;
pub mod settings;
