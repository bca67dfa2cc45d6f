use crate::catalog;
use crate::composition::{Composition, CompositionDraft};
use crate::prediction::PredictionReport;
use crate::validate::{AmountRule, ValidationError, validate_draft, validate_selections};

/// The wizard's screens. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Start,
    MaterialSelection,
    RecipeSelection,
    MaterialComposition,
    PredictionResults,
}

/// The single owner of one wizard run's state.
///
/// All mutation goes through the named methods below; validation failures
/// are returned to the caller and never advance the screen. The session has
/// no terminal state — `reset` cycles it back to [`Screen::Start`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    screen: Screen,
    amount_rule: AmountRule,
    slots: Vec<Option<String>>,
    draft: CompositionDraft,
    selected_recipe: Option<String>,
    came_from_recipe: bool,
    submitted: Option<Composition>,
    report: Option<PredictionReport>,
}

impl Session {
    pub fn new(amount_rule: AmountRule) -> Self {
        Self {
            amount_rule,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn amount_rule(&self) -> AmountRule {
        self.amount_rule
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    pub fn draft(&self) -> &CompositionDraft {
        &self.draft
    }

    pub fn selected_recipe(&self) -> Option<&str> {
        self.selected_recipe.as_deref()
    }

    pub fn came_from_recipe(&self) -> bool {
        self.came_from_recipe
    }

    /// The composition most recently accepted by [`Session::submit`].
    pub fn submitted(&self) -> Option<&Composition> {
        self.submitted.as_ref()
    }

    pub fn report(&self) -> Option<&PredictionReport> {
        self.report.as_ref()
    }

    /// Start-screen branch: build a new composition from scratch.
    pub fn choose_new_composition(&mut self) {
        self.came_from_recipe = false;
        self.screen = Screen::MaterialSelection;
    }

    /// Start-screen branch: modify a server-stored recipe.
    pub fn choose_existing_recipe(&mut self) {
        self.came_from_recipe = true;
        self.screen = Screen::RecipeSelection;
    }

    /// Sets how many material slots the selection screen offers. Any count
    /// outside `1..=catalog::max_slots()` is clamped. Existing picks are
    /// discarded, matching the selection screen's behavior.
    pub fn set_slot_count(&mut self, count: usize) {
        let count = count.clamp(1, catalog::max_slots());
        self.slots = vec![None; count];
    }

    pub fn set_slot(&mut self, index: usize, material: Option<String>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = material;
        }
    }

    /// Gate between material selection and the composition screen.
    ///
    /// # Errors
    /// Propagates [`validate_selections`] failures; the screen does not
    /// change on error.
    pub fn proceed_to_composition(&mut self) -> Result<(), ValidationError> {
        let picked = validate_selections(&self.slots)?;
        self.draft = CompositionDraft::from_materials(picked);
        self.came_from_recipe = false;
        self.screen = Screen::MaterialComposition;
        Ok(())
    }

    /// Pre-populates the composition screen from a recipe snapshot fetched
    /// by the gateway and moves onto it.
    pub fn apply_recipe(&mut self, name: impl Into<String>, composition: &Composition) {
        self.draft = CompositionDraft::from_composition(composition);
        self.selected_recipe = Some(name.into());
        self.came_from_recipe = true;
        self.screen = Screen::MaterialComposition;
    }

    /// Keystroke mutation of one amount field.
    pub fn set_amount(&mut self, index: usize, amount: impl Into<String>) {
        self.draft.set_amount(index, amount);
    }

    /// Gate between the composition screen and the prediction call. On
    /// success the validated composition is returned for the gateway (and
    /// remembered for the results screen and export); the screen itself
    /// only advances once [`Session::apply_prediction`] delivers a result.
    ///
    /// # Errors
    /// Propagates [`validate_draft`] failures; the screen does not change
    /// and no gateway payload is produced.
    pub fn submit(&mut self) -> Result<Composition, ValidationError> {
        let composition = validate_draft(&self.draft, self.amount_rule)?;
        self.submitted = Some(composition.clone());
        Ok(composition)
    }

    /// Delivers a formatted prediction and moves to the results screen.
    pub fn apply_prediction(&mut self, report: PredictionReport) {
        self.report = Some(report);
        self.screen = Screen::PredictionResults;
    }

    /// One step backwards. Results return to the composition screen with
    /// the draft intact; the composition screen returns to whichever screen
    /// produced it; the selection screens return to the start.
    pub fn back(&mut self) {
        self.screen = match self.screen {
            Screen::Start => Screen::Start,
            Screen::MaterialSelection | Screen::RecipeSelection => Screen::Start,
            Screen::MaterialComposition => {
                if self.came_from_recipe {
                    Screen::RecipeSelection
                } else {
                    Screen::MaterialSelection
                }
            }
            Screen::PredictionResults => Screen::MaterialComposition,
        };
    }

    /// "New Prediction": wipes all wizard state and returns to the start.
    /// The configured amount rule survives the reset.
    pub fn reset(&mut self) {
        *self = Self::new(self.amount_rule);
    }
}
