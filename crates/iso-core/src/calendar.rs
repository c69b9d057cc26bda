//! In-game date-time arithmetic and the per-world calendar with its time events.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{IsoError, IsoResult};
use crate::numbers::ordinal;

// ---------------------------------------------------------------------------
// Real-time units and game speeds
// ---------------------------------------------------------------------------

/// One real second.
pub const REAL_SECOND: i64 = 1;
/// One real minute, in seconds.
pub const REAL_MINUTE: i64 = REAL_SECOND * 60;
/// One real hour, in seconds.
pub const REAL_HOUR: i64 = REAL_MINUTE * 60;
/// One real day, in seconds.
pub const REAL_DAY: i64 = REAL_HOUR * 24;
/// One real week, in seconds.
pub const REAL_WEEK: i64 = REAL_DAY * 7;
/// Four real weeks, in seconds.
pub const REAL_MONTH: i64 = REAL_WEEK * 4;
/// One 365-day year, in seconds.
pub const REAL_YEAR: i64 = REAL_DAY * 365;
/// A quarter year, in seconds.
pub const REAL_SEASON: i64 = REAL_YEAR / 4;

/// World seconds that pass per real second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameSpeed(pub u32);

impl GameSpeed {
    /// A year passes in five real minutes.
    pub const SPEED_10: Self = Self((REAL_YEAR / (5 * REAL_MINUTE)) as u32);
    /// A year passes in a real hour.
    pub const SPEED_09: Self = Self((REAL_YEAR / REAL_HOUR) as u32);
    /// A season passes in a real hour.
    pub const SPEED_08: Self = Self((REAL_SEASON / REAL_HOUR) as u32);
    /// A day passes in a real minute.
    pub const SPEED_07: Self = Self((REAL_DAY / REAL_MINUTE) as u32);
    /// A month passes in a real hour.
    pub const SPEED_06: Self = Self((REAL_MONTH / REAL_HOUR) as u32);
    /// A night passes in about thirty real seconds.
    pub const SPEED_05: Self = Self(((REAL_DAY / 8) / (REAL_MINUTE / 2)) as u32);
    /// A week passes in a real hour.
    pub const SPEED_04: Self = Self((REAL_WEEK / REAL_HOUR) as u32);
    /// Three days pass in a real hour.
    pub const SPEED_03: Self = Self(((REAL_DAY * 3) / REAL_HOUR) as u32);
    /// Half an hour passes in a real minute.
    pub const SPEED_02: Self = Self(((REAL_HOUR / 2) / REAL_MINUTE) as u32);
    /// An hour passes in five real minutes.
    pub const SPEED_01: Self = Self((REAL_HOUR / (5 * REAL_MINUTE)) as u32);
    /// World time runs at wall-clock speed.
    pub const SPEED_00: Self = Self(1);

    /// The multiplier as a float.
    pub fn factor(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for GameSpeed {
    fn default() -> Self {
        Self::SPEED_03
    }
}

// ---------------------------------------------------------------------------
// Calendar definitions
// ---------------------------------------------------------------------------

/// A named month in a custom calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct Month {
    /// Full name.
    pub name: String,
    /// Short name.
    pub abbrev: String,
    /// Day of the year the month starts on.
    pub start_day: u32,
    /// Length in days.
    pub days: u32,
}

impl Month {
    /// A month whose abbreviation is the first three letters of its name.
    pub fn new(name: impl Into<String>, start_day: u32, days: u32) -> Self {
        let name = name.into();
        let abbrev = name.chars().take(3).collect();
        Self {
            name,
            abbrev,
            start_day,
            days,
        }
    }

    /// Override the abbreviation.
    pub fn with_abbrev(mut self, abbrev: impl Into<String>) -> Self {
        self.abbrev = abbrev.into();
        self
    }
}

/// Shape of a calendar: how many months, days, and hours it counts.
///
/// Minutes and seconds are always sixty.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSpec {
    /// Months per year.
    pub months_in_year: i64,
    /// Average days per month; may be fractional.
    pub days_in_month: f64,
    /// Hours per day.
    pub hours_in_day: i64,
    /// Optional named months, in order.
    pub months: Vec<Month>,
}

impl Default for CalendarSpec {
    fn default() -> Self {
        Self {
            months_in_year: 12,
            days_in_month: 30.4375,
            hours_in_day: 24,
            months: Vec::new(),
        }
    }
}

static EARTH: LazyLock<Arc<CalendarSpec>> = LazyLock::new(|| Arc::new(CalendarSpec::default()));

impl CalendarSpec {
    /// A calendar with the given counts and no named months.
    pub fn new(months_in_year: i64, days_in_month: f64, hours_in_day: i64) -> Self {
        Self {
            months_in_year,
            days_in_month,
            hours_in_day,
            months: Vec::new(),
        }
    }

    /// Name the months.
    pub fn with_months(mut self, months: Vec<Month>) -> Self {
        self.months = months;
        self
    }

    /// Days per year: the sum of the named months, or months times days.
    pub fn days_in_year(&self) -> f64 {
        if self.months.is_empty() {
            self.months_in_year as f64 * self.days_in_month
        } else {
            self.months.iter().map(|m| f64::from(m.days)).sum()
        }
    }

    fn day_seconds(&self) -> f64 {
        (self.hours_in_day * REAL_HOUR) as f64
    }

    fn month_seconds(&self) -> f64 {
        self.days_in_month * self.day_seconds()
    }

    fn year_seconds(&self) -> f64 {
        self.months_in_year as f64 * self.month_seconds()
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.months_in_year == other.months_in_year
            && self.days_in_month == other.days_in_month
            && self.hours_in_day == other.hours_in_day
    }
}

// ---------------------------------------------------------------------------
// DateTime
// ---------------------------------------------------------------------------

/// A wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    /// Hour.
    pub hours: i64,
    /// Minute.
    pub minutes: i64,
    /// Second.
    pub seconds: i64,
}

impl TimeOfDay {
    /// A time of day.
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Seconds since midnight.
    pub fn as_seconds(self) -> i64 {
        self.hours * REAL_HOUR + self.minutes * REAL_MINUTE + self.seconds
    }
}

/// An in-game date and time in some calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTime {
    /// Year.
    pub year: i64,
    /// Month of the year, starting at 1.
    pub month: i64,
    /// Day of the month, starting at 1.
    pub day: i64,
    /// Hour of the day.
    pub hours: i64,
    /// Minute of the hour.
    pub minutes: i64,
    /// Second of the minute.
    pub seconds: i64,
    spec: Arc<CalendarSpec>,
}

impl DateTime {
    /// A date-time in the Earth-like default calendar. Overflowing hours,
    /// days, and months carry into the next larger unit.
    pub fn new(year: i64, month: i64, day: i64, hours: i64, minutes: i64, seconds: i64) -> Self {
        Self::in_calendar(Arc::clone(&EARTH), year, month, day, hours, minutes, seconds)
    }

    /// A date-time in the given calendar, carrying overflow like [`DateTime::new`].
    pub fn in_calendar(
        spec: Arc<CalendarSpec>,
        year: i64,
        month: i64,
        day: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Self {
        let (mut year, mut month, mut day, mut hours) = (year, month, day, hours);
        if hours > spec.hours_in_day {
            day += hours.div_euclid(spec.hours_in_day);
            hours = hours.rem_euclid(spec.hours_in_day);
        }
        let month_days = spec.days_in_month.ceil() as i64;
        if day > month_days {
            month += day.div_euclid(month_days);
            day = day.rem_euclid(month_days);
        }
        if month > spec.months_in_year {
            year += month.div_euclid(spec.months_in_year);
            month = month.rem_euclid(spec.months_in_year);
        }
        Self {
            year,
            month,
            day,
            hours,
            minutes,
            seconds,
            spec,
        }
    }

    /// The current local time in the default calendar.
    pub fn now() -> Self {
        let now = Local::now();
        Self::new(
            i64::from(now.year()),
            i64::from(now.month()),
            i64::from(now.day()),
            i64::from(now.hour()),
            i64::from(now.minute()),
            i64::from(now.second()),
        )
    }

    /// The calendar this date-time is counted in.
    pub fn spec(&self) -> &Arc<CalendarSpec> {
        &self.spec
    }

    /// Absolute seconds since year zero.
    pub fn as_seconds(&self) -> i64 {
        let spec = &self.spec;
        let dated = self.year as f64 * spec.year_seconds()
            + self.month as f64 * spec.month_seconds()
            + self.day as f64 * spec.day_seconds();
        dated as i64 + self.hours * REAL_HOUR + self.minutes * REAL_MINUTE + self.seconds
    }

    /// The date-time `seconds` after year zero, in this date-time's calendar.
    pub fn from_seconds(&self, seconds: i64) -> Self {
        let spec = &self.spec;
        let (year, rest) = div_mod(seconds as f64, spec.year_seconds());
        let (month, rest) = div_mod(rest, spec.month_seconds());
        let (day, rest) = div_mod(rest, spec.day_seconds());
        let (hours, rest) = div_mod(rest, REAL_HOUR as f64);
        let (minutes, seconds) = div_mod(rest, REAL_MINUTE as f64);
        Self::in_calendar(
            Arc::clone(spec),
            year as i64,
            month as i64,
            day as i64,
            hours as i64,
            minutes as i64,
            seconds as i64,
        )
    }

    /// This date-time moved by `seconds`.
    pub fn plus_seconds(&self, seconds: i64) -> Self {
        self.from_seconds(self.as_seconds() + seconds)
    }

    /// Seconds from `earlier` to `self`. Both must share the same calendar
    /// shape.
    pub fn seconds_since(&self, earlier: &DateTime) -> IsoResult<i64> {
        if !self.spec.same_shape(&earlier.spec) {
            return Err(IsoError::CalendarMismatch);
        }
        Ok(self.as_seconds() - earlier.as_seconds())
    }

    /// The time-of-day part.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::new(self.hours, self.minutes, self.seconds)
    }

    /// Named month definition, if the calendar has one for this month.
    pub fn month_definition(&self) -> Option<&Month> {
        usize::try_from(self.month - 1)
            .ok()
            .and_then(|i| self.spec.months.get(i))
    }

    /// Days in the current month.
    pub fn days_in_month(&self) -> f64 {
        self.month_definition()
            .map_or(self.spec.days_in_month, |m| f64::from(m.days))
    }

    /// Days in a year of this calendar.
    pub fn days_in_year(&self) -> f64 {
        self.spec.days_in_year()
    }

    /// Name of the month: the calendar's own, or the English name.
    pub fn month_name(&self, short: bool) -> String {
        if let Some(month) = self.month_definition() {
            return if short {
                month.abbrev.clone()
            } else {
                month.name.clone()
            };
        }
        let english = u8::try_from(self.month)
            .ok()
            .and_then(|m| chrono::Month::try_from(m).ok());
        match english {
            Some(month) if short => month.name().chars().take(3).collect(),
            Some(month) => month.name().to_owned(),
            None => format!("month {}", self.month),
        }
    }

    /// A sentence-friendly date, e.g. `the 17th day of August, year 1972`.
    pub fn friendly_date(&self) -> String {
        format!(
            "the {} day of {}, year {}",
            ordinal(self.day),
            self.month_name(false),
            self.year
        )
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds
        )
    }
}

fn div_mod(value: f64, unit: f64) -> (f64, f64) {
    let quotient = (value / unit).floor();
    (quotient, value - quotient * unit)
}

// ---------------------------------------------------------------------------
// Time classification
// ---------------------------------------------------------------------------

/// Order of magnitude of a time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    /// Under a minute.
    Second,
    /// Under an hour.
    Minute,
    /// Under a day.
    Hour,
    /// Under a month.
    Day,
    /// Under a year.
    Month,
    /// A year or more.
    Year,
}

/// Which calendar boundary a time step crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeChange {
    /// The hour changed within the same day.
    Hour,
    /// Dawn was passed within the same day.
    Dawn,
    /// Dusk was passed within the same day.
    Dusk,
    /// The day changed within the same month.
    Day,
    /// The month changed within the same year.
    Month,
    /// The season changed.
    Season,
    /// The year changed.
    Year,
}

/// What a scheduled time event listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeTrigger {
    /// A step of the given magnitude.
    Scale(TimeScale),
    /// A step crossing the given boundary.
    Change(TimeChange),
}

impl fmt::Display for TimeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale(scale) => write!(f, "{scale:?} scale"),
            Self::Change(change) => write!(f, "{change:?} change"),
        }
    }
}

/// Kind of event published when a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeEventClass {
    /// A new hour began.
    HourChange,
    /// Dawn broke.
    DawnChange,
    /// Dusk fell.
    DuskChange,
    /// A new day began.
    DayChange,
    /// A new month began.
    MonthChange,
    /// A new season began.
    SeasonChange,
    /// A new year began.
    YearChange,
    /// A game-defined class.
    Custom(String),
}

impl fmt::Display for TimeEventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HourChange => f.write_str("hour change"),
            Self::DawnChange => f.write_str("dawn"),
            Self::DuskChange => f.write_str("dusk"),
            Self::DayChange => f.write_str("day change"),
            Self::MonthChange => f.write_str("month change"),
            Self::SeasonChange => f.write_str("season change"),
            Self::YearChange => f.write_str("year change"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// A fired time event.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEvent {
    /// Registered class of the event.
    pub class: TimeEventClass,
    /// The trigger that fired.
    pub trigger: TimeTrigger,
    /// The calendar time after the step.
    pub time: DateTime,
    /// The calendar time before the step.
    pub last_time: DateTime,
}

/// A named season starting on a given month and day each year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// Name, e.g. `Spring`.
    pub name: String,
    /// First month of the season.
    pub start_month: i64,
    /// First day of the season within `start_month`.
    pub start_day: i64,
}

impl Season {
    /// A season.
    pub fn new(name: impl Into<String>, start_month: i64, start_day: i64) -> Self {
        Self {
            name: name.into(),
            start_month,
            start_day,
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// A world's clock: current time, last time, and the registered time
/// triggers.
#[derive(Debug, Clone)]
pub struct Calendar {
    time: DateTime,
    last_time: Option<DateTime>,
    /// Time of day at which dawn breaks.
    pub dawn: Option<TimeOfDay>,
    /// Time of day at which dusk falls.
    pub dusk: Option<TimeOfDay>,
    seasons: Vec<Season>,
    events: HashMap<TimeTrigger, TimeEventClass>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(DateTime::now())
    }
}

impl Calendar {
    /// A calendar set to `time`.
    pub fn new(time: DateTime) -> Self {
        Self {
            time,
            last_time: None,
            dawn: None,
            dusk: None,
            seasons: Vec::new(),
            events: HashMap::new(),
        }
    }

    /// Set the dawn boundary.
    pub fn with_dawn(mut self, dawn: TimeOfDay) -> Self {
        self.dawn = Some(dawn);
        self
    }

    /// Set the dusk boundary.
    pub fn with_dusk(mut self, dusk: TimeOfDay) -> Self {
        self.dusk = Some(dusk);
        self
    }

    /// Set the seasons; order does not matter.
    pub fn with_seasons(mut self, mut seasons: Vec<Season>) -> Self {
        seasons.sort_by_key(|s| (s.start_month, s.start_day));
        self.seasons = seasons;
        self
    }

    /// Current time.
    pub fn time(&self) -> &DateTime {
        &self.time
    }

    /// Time before the last step, if any step happened.
    pub fn last_time(&self) -> Option<&DateTime> {
        self.last_time.as_ref()
    }

    /// Publish `class` whenever `trigger` fires. Replaces any class already
    /// registered for the trigger.
    pub fn set_time_event(&mut self, trigger: TimeTrigger, class: TimeEventClass) {
        self.events.insert(trigger, class);
    }

    /// Class registered for `trigger`.
    pub fn time_event(&self, trigger: TimeTrigger) -> Option<&TimeEventClass> {
        self.events.get(&trigger)
    }

    /// Stop publishing anything for `trigger`.
    pub fn clear_time_event(&mut self, trigger: TimeTrigger) -> Option<TimeEventClass> {
        self.events.remove(&trigger)
    }

    /// Jump to `time` without classifying the step.
    pub fn reset(&mut self, time: DateTime) {
        self.time = time;
        self.last_time = None;
    }

    /// Season in effect at `time`.
    pub fn season_at(&self, time: &DateTime) -> Option<&Season> {
        let key = (time.month, time.day);
        self.seasons
            .iter()
            .rev()
            .find(|s| (s.start_month, s.start_day) <= key)
            .or_else(|| self.seasons.last())
    }

    /// Season in effect now.
    pub fn current_season(&self) -> Option<&Season> {
        self.season_at(&self.time)
    }

    /// Magnitude of a step of `delta` seconds: the largest unit that fits
    /// into it at least once.
    pub fn time_scale(&self, delta: i64) -> TimeScale {
        let spec = self.time.spec();
        let ladder = [
            (TimeScale::Minute, REAL_MINUTE as f64),
            (TimeScale::Hour, REAL_HOUR as f64),
            (TimeScale::Day, spec.day_seconds()),
            (TimeScale::Month, spec.month_seconds()),
            (TimeScale::Year, spec.days_in_year() * spec.day_seconds()),
        ];
        let delta = delta.unsigned_abs() as f64;
        let mut scale = TimeScale::Second;
        for (next, unit) in ladder {
            if (delta / unit).floor() == 0.0 {
                return scale;
            }
            scale = next;
        }
        scale
    }

    /// Boundary crossed between `last` and `new`, if any.
    pub fn time_change(&self, last: &DateTime, new: &DateTime) -> Option<TimeChange> {
        let same_year = last.year == new.year;
        let same_month = same_year && last.month == new.month;
        let same_day = same_month && last.day == new.day;
        let crossed = |boundary: Option<TimeOfDay>| {
            boundary.is_some_and(|b| {
                let b = b.as_seconds();
                last.time_of_day().as_seconds() < b && b <= new.time_of_day().as_seconds()
            })
        };

        if same_day && last.hours != new.hours {
            Some(TimeChange::Hour)
        } else if same_day && crossed(self.dawn) {
            Some(TimeChange::Dawn)
        } else if same_day && crossed(self.dusk) {
            Some(TimeChange::Dusk)
        } else if same_month && last.day != new.day {
            Some(TimeChange::Day)
        } else if same_year && last.month != new.month {
            Some(TimeChange::Month)
        } else if !same_year {
            Some(TimeChange::Year)
        } else {
            None
        }
    }

    /// Move the clock to `new` and return the events its registered
    /// triggers produce: the scale event, then the change event, then a
    /// season change.
    pub fn set_time(&mut self, new: DateTime) -> Vec<TimeEvent> {
        let last = std::mem::replace(&mut self.time, new);
        let delta = self.time.as_seconds() - last.as_seconds();

        let mut fired = vec![TimeTrigger::Scale(self.time_scale(delta))];
        if let Some(change) = self.time_change(&last, &self.time) {
            fired.push(TimeTrigger::Change(change));
        }
        let last_season = self.season_at(&last).map(|s| s.name.as_str());
        let season = self.current_season().map(|s| s.name.as_str());
        if last_season != season {
            fired.push(TimeTrigger::Change(TimeChange::Season));
        }

        let events = fired
            .into_iter()
            .filter_map(|trigger| {
                self.events.get(&trigger).map(|class| TimeEvent {
                    class: class.clone(),
                    trigger,
                    time: self.time.clone(),
                    last_time: last.clone(),
                })
            })
            .collect();
        self.last_time = Some(last);
        events
    }

    /// Advance the clock by `seconds` of world time.
    pub fn advance(&mut self, seconds: i64) -> Vec<TimeEvent> {
        let next = self.time.plus_seconds(seconds);
        self.set_time(next)
    }
}
