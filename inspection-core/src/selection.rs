//! Selection state machine for the map popup.
//!
//! The selected establishment, the popup content, and the popup position
//! live in one [`SelectionState::Selected`] value, so they are always set or
//! cleared together. Every change of selection bumps a [`Generation`] used to
//! recognise inference results that arrive after the user moved on.

use std::fmt;

use geo::Coord;
use log::{debug, warn};

use crate::coordinate::anchor_near_pointer;
use crate::{Establishment, Field, MapEvent, MapEventKind, ScreenPoint};

/// Monotonically increasing selection counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the popup collaborator renders for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    /// Name, or its fallback text.
    pub name: String,
    /// Address, or its fallback text.
    pub address: String,
    /// Phone, or its fallback text.
    pub phone: String,
    /// Cuisine, or its fallback text.
    pub cuisine: String,
    /// Pixel position where the popup is drawn.
    pub screen: ScreenPoint,
    /// Geographic anchor unwrapped next to the pointer.
    pub anchor: Coord<f64>,
}

impl PopupView {
    fn project(establishment: &Establishment, screen: ScreenPoint, anchor: Coord<f64>) -> Self {
        let text = |field: Field| establishment.display(field).into_owned();
        Self {
            name: text(Field::Name),
            address: text(Field::Address),
            phone: text(Field::Phone),
            cuisine: text(Field::Cuisine),
            screen,
            anchor,
        }
    }
}

/// A selected establishment together with its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    establishment: Establishment,
    popup: PopupView,
    generation: Generation,
}

impl Selection {
    /// The selected establishment.
    #[must_use]
    pub const fn establishment(&self) -> &Establishment {
        &self.establishment
    }

    /// The popup projected from the establishment.
    #[must_use]
    pub const fn popup(&self) -> &PopupView {
        &self.popup
    }

    /// Generation this selection was made in.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}

/// Current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    /// Nothing selected; popup hidden.
    #[default]
    Idle,
    /// One establishment selected; popup shown.
    Selected(Selection),
}

/// Effect of an event on the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Idle → Selected`.
    Selected,
    /// `Selected → Selected` with a new establishment.
    Replaced,
    /// `Selected → Idle`.
    Cleared,
    /// No change.
    Unchanged,
}

/// Owns the selection and applies map events to it.
///
/// # Examples
///
/// ```
/// use inspection_core::{
///     EventFeature, FeatureGeometry, LngLat, MapEvent, ScreenPoint, SelectionMachine, Transition,
/// };
///
/// let mut machine = SelectionMachine::new();
/// let feature = EventFeature {
///     geometry: Some(FeatureGeometry::point(-74.01, 40.71)),
///     properties: Default::default(),
/// };
/// let click = MapEvent::click(feature, ScreenPoint::default(), LngLat::default());
/// assert_eq!(machine.apply(&click), Transition::Selected);
/// assert!(machine.selection().is_some());
///
/// let background = MapEvent::background_click(ScreenPoint::default(), LngLat::default());
/// assert_eq!(machine.apply(&background), Transition::Cleared);
/// assert!(machine.selection().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
    generation: Generation,
}

impl SelectionMachine {
    /// Start idle at the initial generation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Current selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        match &self.state {
            SelectionState::Selected(selection) => Some(selection),
            SelectionState::Idle => None,
        }
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Apply a pointer event.
    ///
    /// Clicks on the point layer with usable point geometry select the
    /// topmost feature; clicks on the background clear the selection. Clicks
    /// whose geometry lacks coordinates and hover events leave the state
    /// untouched.
    pub fn apply(&mut self, event: &MapEvent) -> Transition {
        if event.kind != MapEventKind::Click {
            return Transition::Unchanged;
        }
        let Some(feature) = event.top_feature() else {
            return self.clear();
        };
        let Some(position) = feature.geometry.as_ref().and_then(|g| g.position()) else {
            warn!("ignoring click on feature without point coordinates");
            return Transition::Unchanged;
        };

        let establishment = Establishment::from_properties(position, &feature.properties);
        let anchor = anchor_near_pointer(position, event.lng_lat.lng);
        let popup = PopupView::project(&establishment, event.point, anchor);
        let transition = match self.state {
            SelectionState::Idle => Transition::Selected,
            SelectionState::Selected(_) => Transition::Replaced,
        };
        self.generation = self.generation.next();
        self.state = SelectionState::Selected(Selection {
            establishment,
            popup,
            generation: self.generation,
        });
        debug!("selection {transition:?} at generation {}", self.generation);
        transition
    }

    /// Close the popup, e.g. from its close button.
    pub fn dismiss(&mut self) -> Transition {
        self.clear()
    }

    fn clear(&mut self) -> Transition {
        if matches!(self.state, SelectionState::Idle) {
            return Transition::Unchanged;
        }
        self.generation = self.generation.next();
        self.state = SelectionState::Idle;
        debug!("selection cleared at generation {}", self.generation);
        Transition::Cleared
    }
}
