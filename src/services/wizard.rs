//! Booking wizard state machine
//!
//! A linear three-step flow (room -> details -> payment) that threads one
//! accumulating `Booking` through sequential steps. All transitions are
//! synchronous and in-memory; the only failure path is a guard blocking
//! the transition. Completing payment hands off to the navigation
//! collaborator - the wizard has no terminal state of its own.

use crate::domain::booking::{new_booking_reference, Booking};
use crate::domain::types::{GuestDetails, Retreat, RoomTier};
use thiserror::Error;
use tracing::{debug, info};

/// Wizard steps, in order. No branching beyond back-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Room,
    Details,
    Payment,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Room => "room",
            Step::Details => "details",
            Step::Payment => "payment",
        }
    }
}

/// Navigation collaborator. The wizard owns no routing or presentation;
/// it signals the host through this seam, which also makes the side
/// effects observable in tests.
pub trait Navigator {
    /// Reset the viewport after the room -> details transition.
    fn scroll_to_top(&self);
    /// Leave the wizard for the retreat's overview page (entry guard).
    fn to_retreat_overview(&self, slug: &str);
    /// Hand off to the external confirmation view.
    fn to_confirmation(&self, reference: &str, retreat_slug: &str);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("retreat {0} has no available room tiers")]
    NoAvailability(String),
    #[error("room tier {0} is not available on this retreat")]
    UnknownTier(String),
    #[error("operation not valid in step {0}")]
    WrongStep(&'static str),
}

/// Controller for one booking session. Exclusively owns the booking
/// record; discarded wholesale when the user navigates away.
pub struct BookingWizard<N: Navigator> {
    step: Step,
    booking: Booking,
    /// Snapshot of the retreat's available tiers, refreshed by `sync_retreat`.
    tiers: Vec<RoomTier>,
    nav: N,
}

impl<N: Navigator> BookingWizard<N> {
    /// Mount the wizard for a retreat.
    ///
    /// Entry guard: a retreat with zero available room tiers is not
    /// enterable at all - control is redirected to the retreat overview
    /// and mounting fails.
    pub fn mount(retreat: &Retreat, nav: N) -> Result<Self, WizardError> {
        if !retreat.has_availability() {
            nav.to_retreat_overview(&retreat.slug);
            return Err(WizardError::NoAvailability(retreat.slug.clone()));
        }

        info!(retreat = %retreat.slug, "wizard_mounted");

        Ok(Self {
            step: Step::Room,
            booking: Booking::new(&retreat.slug, &retreat.title, &retreat.date_range),
            tiers: retreat.available_tiers().cloned().collect(),
            nav,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    /// Re-check the entry guard against fresh retreat data.
    ///
    /// The guard is reactive: if availability drops to zero while the
    /// wizard is mounted, control is redirected and the wizard must be
    /// discarded.
    pub fn sync_retreat(&mut self, retreat: &Retreat) -> Result<(), WizardError> {
        if !retreat.has_availability() {
            self.nav.to_retreat_overview(&retreat.slug);
            return Err(WizardError::NoAvailability(retreat.slug.clone()));
        }
        self.tiers = retreat.available_tiers().cloned().collect();
        debug!(retreat = %retreat.slug, tiers = self.tiers.len(), "wizard_retreat_synced");
        Ok(())
    }

    /// Select a room tier and advance to the details step.
    ///
    /// The tier must come from the mounted retreat's available tiers.
    pub fn select_room(&mut self, tier_id: &str) -> Result<(), WizardError> {
        if self.step != Step::Room {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }

        let tier = self
            .tiers
            .iter()
            .find(|t| t.id == tier_id)
            .ok_or_else(|| WizardError::UnknownTier(tier_id.to_string()))?
            .clone();

        info!(retreat = %self.booking.retreat_slug, tier = %tier.id, "room_selected");

        self.booking.selected_room = Some(tier);
        self.step = Step::Details;
        self.nav.scroll_to_top();
        Ok(())
    }

    /// Record submitted guest details and advance to the payment step.
    ///
    /// Field validation is the details form's responsibility; the wizard
    /// only records the result.
    pub fn submit_details(&mut self, details: GuestDetails) -> Result<(), WizardError> {
        if self.step != Step::Details {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }

        info!(retreat = %self.booking.retreat_slug, "guest_details_submitted");

        self.booking.guest_details = Some(details);
        self.step = Step::Payment;
        Ok(())
    }

    /// Confirm the (simulated) payment and hand off to the confirmation
    /// view. No payment gateway is involved; this generates the booking
    /// reference and exits the wizard.
    pub fn confirm_payment(&mut self) -> Result<String, WizardError> {
        if self.step != Step::Payment {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }

        let reference = new_booking_reference();

        info!(
            retreat = %self.booking.retreat_slug,
            reference = %reference,
            "booking_confirmed"
        );

        self.booking.payment_complete = true;
        self.booking.reference = Some(reference.clone());
        self.nav.to_confirmation(&reference, &self.booking.retreat_slug);
        Ok(reference)
    }

    /// Step back one state. A no-op in the room step. Previously entered
    /// data is retained.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Room => Step::Room,
            Step::Details => Step::Room,
            Step::Payment => Step::Details,
        };
        debug!(step = %self.step.as_str(), "wizard_back");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RoomTier;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum NavCall {
        ScrollToTop,
        Overview(String),
        Confirmation(String, String),
    }

    #[derive(Clone, Default)]
    struct RecordingNav {
        calls: Rc<RefCell<Vec<NavCall>>>,
    }

    impl Navigator for RecordingNav {
        fn scroll_to_top(&self) {
            self.calls.borrow_mut().push(NavCall::ScrollToTop);
        }

        fn to_retreat_overview(&self, slug: &str) {
            self.calls.borrow_mut().push(NavCall::Overview(slug.to_string()));
        }

        fn to_confirmation(&self, reference: &str, retreat_slug: &str) {
            self.calls
                .borrow_mut()
                .push(NavCall::Confirmation(reference.to_string(), retreat_slug.to_string()));
        }
    }

    fn tier(id: &str, available: bool) -> RoomTier {
        RoomTier {
            id: id.to_string(),
            name: format!("Tier {id}"),
            bed_configuration: "1 queen bed".to_string(),
            occupancy: 2,
            price_early_bird: 1800,
            price_regular: 2100,
            description: String::new(),
            gallery: Vec::new(),
            available,
        }
    }

    fn retreat(tiers: Vec<RoomTier>) -> Retreat {
        Retreat {
            slug: "sacred-valley".to_string(),
            title: "Sacred Valley Retreat".to_string(),
            location: "Peru".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 21).unwrap(),
            date_range: "March 14-21, 2026".to_string(),
            room_tiers: tiers,
        }
    }

    fn details() -> GuestDetails {
        GuestDetails {
            first_name: "Maya".to_string(),
            last_name: "Lindqvist".to_string(),
            email: "maya@example.com".to_string(),
            phone_country_code: "+46".to_string(),
            phone: "701234567".to_string(),
            dietary_restrictions: "vegetarian".to_string(),
            emergency_contact_name: "Erik Lindqvist".to_string(),
            emergency_contact_phone: "+46709876543".to_string(),
            special_requests: String::new(),
        }
    }

    #[test]
    fn test_mount_starts_in_room_step() {
        let wizard = BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
            .unwrap();
        assert_eq!(wizard.step(), Step::Room);
        assert!(wizard.booking().selected_room.is_none());
    }

    #[test]
    fn test_mount_redirects_when_no_availability() {
        let nav = RecordingNav::default();
        let result = BookingWizard::mount(&retreat(vec![tier("shared", false)]), nav.clone());

        assert_eq!(result.err(), Some(WizardError::NoAvailability("sacred-valley".to_string())));
        assert_eq!(
            nav.calls.borrow().as_slice(),
            &[NavCall::Overview("sacred-valley".to_string())]
        );
    }

    #[test]
    fn test_select_room_advances_and_scrolls() {
        let nav = RecordingNav::default();
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), nav.clone()).unwrap();

        wizard.select_room("shared").unwrap();

        assert_eq!(wizard.step(), Step::Details);
        assert_eq!(wizard.booking().selected_room.as_ref().unwrap().id, "shared");
        assert_eq!(nav.calls.borrow().as_slice(), &[NavCall::ScrollToTop]);
    }

    #[test]
    fn test_select_room_rejects_unknown_tier() {
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
                .unwrap();

        let err = wizard.select_room("penthouse").unwrap_err();
        assert_eq!(err, WizardError::UnknownTier("penthouse".to_string()));
        assert_eq!(wizard.step(), Step::Room);
    }

    #[test]
    fn test_select_room_rejects_sold_out_tier() {
        let mut wizard = BookingWizard::mount(
            &retreat(vec![tier("shared", true), tier("private", false)]),
            RecordingNav::default(),
        )
        .unwrap();

        assert!(wizard.select_room("private").is_err());
    }

    #[test]
    fn test_back_from_details_retains_selection() {
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
                .unwrap();
        wizard.select_room("shared").unwrap();

        wizard.back();

        assert_eq!(wizard.step(), Step::Room);
        assert!(wizard.booking().selected_room.is_some());
    }

    #[test]
    fn test_back_in_room_is_noop() {
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
                .unwrap();
        wizard.back();
        assert_eq!(wizard.step(), Step::Room);
    }

    #[test]
    fn test_full_flow_confirms_payment() {
        let nav = RecordingNav::default();
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), nav.clone()).unwrap();

        wizard.select_room("shared").unwrap();
        wizard.submit_details(details()).unwrap();
        assert_eq!(wizard.step(), Step::Payment);

        let reference = wizard.confirm_payment().unwrap();

        assert_eq!(reference.len(), 8);
        assert_eq!(reference, reference.to_uppercase());
        assert!(wizard.booking().payment_complete);
        assert_eq!(wizard.booking().reference.as_deref(), Some(reference.as_str()));

        let calls = nav.calls.borrow();
        assert_eq!(
            calls.last(),
            Some(&NavCall::Confirmation(reference.clone(), "sacred-valley".to_string()))
        );
    }

    #[test]
    fn test_out_of_order_operations_are_rejected() {
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
                .unwrap();

        assert_eq!(wizard.confirm_payment().unwrap_err(), WizardError::WrongStep("room"));
        assert_eq!(wizard.submit_details(details()).unwrap_err(), WizardError::WrongStep("room"));

        wizard.select_room("shared").unwrap();
        assert_eq!(wizard.select_room("shared").unwrap_err(), WizardError::WrongStep("details"));
        assert_eq!(wizard.confirm_payment().unwrap_err(), WizardError::WrongStep("details"));
    }

    #[test]
    fn test_sync_retreat_redirects_when_availability_drops() {
        let nav = RecordingNav::default();
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), nav.clone()).unwrap();

        let sold_out = retreat(vec![tier("shared", false)]);
        let err = wizard.sync_retreat(&sold_out).unwrap_err();

        assert_eq!(err, WizardError::NoAvailability("sacred-valley".to_string()));
        assert_eq!(
            nav.calls.borrow().as_slice(),
            &[NavCall::Overview("sacred-valley".to_string())]
        );
    }

    #[test]
    fn test_sync_retreat_refreshes_tier_snapshot() {
        let mut wizard =
            BookingWizard::mount(&retreat(vec![tier("shared", true)]), RecordingNav::default())
                .unwrap();

        let updated = retreat(vec![tier("shared", true), tier("private", true)]);
        wizard.sync_retreat(&updated).unwrap();

        wizard.select_room("private").unwrap();
        assert_eq!(wizard.booking().selected_room.as_ref().unwrap().id, "private");
    }
}
