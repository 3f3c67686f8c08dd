//! Catalog navigation state machine.
//!
//! A three-step funnel over the catalog: pick a category, pick a subcategory when the category
//! has more than one, then browse the procedures. The step is never stored; it is derived from
//! the selection and the catalog every time it is asked for.
//!
//! The URL query string is the source of truth. [`CatalogNavigator::sync_from_params`] rebuilds
//! the selection from it, and every transition returns a [`UrlUpdate`] describing what should be
//! written back. Writing it (redirects, history entries) is the caller's business.

use crate::catalog::{Catalog, Procedure};
use crate::constants::SUBCATEGORY_FALLBACK_DESCRIPTION;
use crate::error::NavigationError;
use crate::query::{listing_href, QueryParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public types
// ============================================================================

/// Wizard step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Category = 1,
    Subcategory = 2,
    Procedures = 3,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }
}

/// The navigation selection carried by the URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: Option<String>,
    pub subcategory_slug: Option<String>,
}

impl Selection {
    pub fn new(category: Option<String>, subcategory_slug: Option<String>) -> Self {
        Self {
            category,
            subcategory_slug,
        }
    }

    /// Decode from query params. Only `cat` and `sub` are read.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            category: params.cat.clone(),
            subcategory_slug: params.sub.clone(),
        }
    }

    /// Encode as query params with only `cat` and `sub` set.
    pub fn to_params(&self) -> QueryParams {
        QueryParams {
            cat: self.category.clone(),
            sub: self.subcategory_slug.clone(),
            ..QueryParams::default()
        }
    }
}

/// How a URL update should be applied to browser history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum History {
    Push,
    Replace,
}

/// A URL write produced by a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlUpdate {
    pub params: QueryParams,
    pub history: History,
}

impl UrlUpdate {
    pub fn href(&self) -> String {
        listing_href(&self.params)
    }
}

/// A subcategory choice offered at step 2.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubcategoryOption {
    pub slug: String,
    pub label: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

// ============================================================================
// State machine
// ============================================================================

#[derive(Clone, Debug)]
pub struct CatalogNavigator<'c> {
    catalog: &'c Catalog,
    selection: Selection,
    text: Option<String>,
}

impl<'c> CatalogNavigator<'c> {
    /// Navigator with nothing selected.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
            text: None,
        }
    }

    /// Navigator holding exactly the selection in `params`, without auto-resolution.
    pub fn from_params(catalog: &'c Catalog, params: &QueryParams) -> Self {
        Self {
            catalog,
            selection: Selection::from_params(params),
            text: params.q.clone(),
        }
    }

    /// Re-derive the selection from the URL, then run the auto-resolution guard.
    ///
    /// Returns the replace-update the guard produced, if it changed anything.
    pub fn sync_from_params(&mut self, params: &QueryParams) -> Option<UrlUpdate> {
        self.selection = Selection::from_params(params);
        self.text = params.q.clone();
        self.resolve_subcategory()
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn category(&self) -> Option<&str> {
        self.selection.category.as_deref()
    }

    pub fn subcategory_slug(&self) -> Option<&str> {
        self.selection.subcategory_slug.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn step(&self) -> Step {
        if self.selection.category.is_none() {
            Step::Category
        } else if self.needs_subcategory() && self.selection.subcategory_slug.is_none() {
            Step::Subcategory
        } else {
            Step::Procedures
        }
    }

    /// Subcategory options of the selected category, first-seen catalog order.
    pub fn subcategory_options(&self) -> Vec<SubcategoryOption> {
        let Some(category) = self.category() else {
            return Vec::new();
        };
        let table = self.catalog.subcategory_table();
        self.catalog
            .subcategories_of(category)
            .into_iter()
            .map(|label| match table.by_label(label) {
                Some(info) => SubcategoryOption {
                    slug: info.slug.to_string(),
                    label: label.to_owned(),
                    title: info.title.clone(),
                    description: info.description.clone(),
                    image: info.image.clone(),
                },
                None => SubcategoryOption {
                    slug: label.to_owned(),
                    label: label.to_owned(),
                    title: label.to_owned(),
                    description: SUBCATEGORY_FALLBACK_DESCRIPTION.to_owned(),
                    image: None,
                },
            })
            .collect()
    }

    /// True when the selected category has more than one subcategory.
    pub fn needs_subcategory(&self) -> bool {
        self.subcategory_options().len() > 1
    }

    /// Label for the selected subcategory slug, falling back to the slug itself.
    pub fn subcategory_label(&self) -> Option<String> {
        self.subcategory_slug()
            .map(|slug| self.catalog.subcategory_table().resolve_label(slug))
    }

    /// Procedures listed at the current step. Empty before step 3.
    pub fn procedures(&self) -> Vec<&'c Procedure> {
        match (self.step(), self.category()) {
            (Step::Procedures, Some(category)) => {
                let label = self.subcategory_label();
                self.catalog.filter(category, label.as_deref())
            }
            _ => Vec::new(),
        }
    }

    /// Select a category. Clears the subcategory and runs the auto-resolution guard.
    pub fn select_category(&mut self, category: impl Into<String>) -> UrlUpdate {
        self.selection.category = Some(category.into());
        self.selection.subcategory_slug = None;
        self.resolve_subcategory();
        self.replace_update()
    }

    /// Select a subcategory of the current category.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NoCategorySelected`] when no category is selected.
    pub fn select_subcategory(
        &mut self,
        slug: impl Into<String>,
    ) -> Result<UrlUpdate, NavigationError> {
        if self.selection.category.is_none() {
            return Err(NavigationError::NoCategorySelected);
        }
        self.selection.subcategory_slug = Some(slug.into());
        Ok(self.replace_update())
    }

    /// Step back.
    ///
    /// From step 3 of a category that needs a subcategory step only the subcategory is cleared.
    /// In every other case both selections are cleared, so a step that was skipped going
    /// forward is skipped going back too. With nothing selected this is a no-op.
    pub fn go_back(&mut self) -> Option<UrlUpdate> {
        self.selection.category.as_ref()?;

        if self.step() == Step::Procedures && self.needs_subcategory() {
            self.selection.subcategory_slug = None;
        } else {
            self.selection = Selection::default();
        }
        Some(self.replace_update())
    }

    /// Auto-resolution guard.
    ///
    /// With exactly one subcategory option that is not selected, select it. With zero options
    /// and a subcategory selected, clear it. Anything else is left alone, including an explicit
    /// choice among several options. Returns the replace-update when something changed.
    pub fn resolve_subcategory(&mut self) -> Option<UrlUpdate> {
        self.selection.category.as_ref()?;

        let options = self.subcategory_options();
        let changed = match options.as_slice() {
            [only] if self.subcategory_slug() != Some(only.slug.as_str()) => {
                self.selection.subcategory_slug = Some(only.slug.clone());
                true
            }
            [] if self.selection.subcategory_slug.is_some() => {
                self.selection.subcategory_slug = None;
                true
            }
            _ => false,
        };

        if changed {
            tracing::debug!(
                category = ?self.selection.category,
                subcategory = ?self.selection.subcategory_slug,
                "auto-resolved subcategory"
            );
            Some(self.replace_update())
        } else {
            None
        }
    }

    /// Params describing the current state, including the derived step.
    pub fn current_params(&self) -> QueryParams {
        QueryParams {
            cat: self.selection.category.clone(),
            sub: self.selection.subcategory_slug.clone(),
            q: self.text.clone(),
            step: Some(self.step().number()),
        }
    }

    /// The link into the funnel from elsewhere on the site. This one is pushed.
    pub fn entry_update() -> UrlUpdate {
        UrlUpdate {
            params: QueryParams::default(),
            history: History::Push,
        }
    }

    fn replace_update(&self) -> UrlUpdate {
        UrlUpdate {
            params: self.current_params(),
            history: History::Replace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AESTHETIC: &str = "Αισθητική Χειρουργική";
    const RECONSTRUCTIVE: &str = "Επανορθωτική Χειρουργική";
    const NON_INVASIVE: &str = "Μή Επεμβατικές Θεραπείες";

    const CATALOG: &str = r#"
categories:
  - label: Αισθητική Χειρουργική
  - label: Επανορθωτική Χειρουργική
  - label: Μή Επεμβατικές Θεραπείες
subcategories:
  - slug: prosopo
    label: Πρόσωπο
    description: Εστίαση στην ισορροπία των χαρακτηριστικών.
  - slug: soma
    label: Σώμα
    description: Βελτίωση περιγράμματος και αναλογιών.
  - slug: therapies
    label: Θεραπείες
    description: Στοχευμένες θεραπείες.
procedures:
  - { id: face-lift, title: Face Lift, slug: face-lift, category: Αισθητική Χειρουργική, subcategory: Πρόσωπο, short_desc: a }
  - { id: otoplastiki, title: Ωτοπλαστική, slug: otoplastiki, category: Αισθητική Χειρουργική, subcategory: Πρόσωπο, short_desc: b }
  - { id: kilioplastiki, title: Κοιλιοπλαστική, slug: kilioplastiki, category: Αισθητική Χειρουργική, subcategory: Σώμα, short_desc: c }
  - { id: melanoma, title: Μελάνωμα, slug: melanoma, category: Επανορθωτική Χειρουργική, short_desc: d }
  - { id: botox, title: Botox, slug: botox, category: Μή Επεμβατικές Θεραπείες, subcategory: Θεραπείες, short_desc: e }
  - { id: laser, title: Laser, slug: laser, category: Μή Επεμβατικές Θεραπείες, subcategory: Θεραπείες, short_desc: f }
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml_str(CATALOG).expect("test catalog")
    }

    fn slugs(procedures: &[&Procedure]) -> Vec<String> {
        procedures.iter().map(|p| p.slug.to_string()).collect()
    }

    #[test]
    fn nothing_selected_is_step_one() {
        let catalog = catalog();
        let nav = CatalogNavigator::new(&catalog);
        assert_eq!(nav.step(), Step::Category);
        assert!(nav.procedures().is_empty());
        assert!(nav.subcategory_options().is_empty());
    }

    #[test]
    fn category_with_many_subcategories_goes_to_step_two() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        let update = nav.select_category(AESTHETIC);

        assert_eq!(nav.step(), Step::Subcategory);
        let labels: Vec<_> = nav.subcategory_options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, ["Πρόσωπο", "Σώμα"]);
        // Empty until a subcategory is chosen.
        assert!(nav.procedures().is_empty());
        assert_eq!(update.history, History::Replace);
        assert_eq!(update.params.sub, None);
        assert_eq!(update.params.step, Some(2));
    }

    #[test]
    fn selecting_a_subcategory_filters_by_label() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category(AESTHETIC);
        let update = nav.select_subcategory("prosopo").expect("category selected");

        assert_eq!(nav.step(), Step::Procedures);
        assert_eq!(slugs(&nav.procedures()), ["face-lift", "otoplastiki"]);

        let expected_cat = serde_urlencoded::to_string(&[("cat", AESTHETIC)]).unwrap();
        assert_eq!(
            update.params.to_query_string(),
            format!("{expected_cat}&sub=prosopo&step=3")
        );
        assert!(expected_cat.contains('+'));
        assert_eq!(update.href(), format!("/catalog?{expected_cat}&sub=prosopo&step=3"));
    }

    #[test]
    fn single_subcategory_is_auto_selected() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        let update = nav.select_category(NON_INVASIVE);

        assert_eq!(nav.step(), Step::Procedures);
        assert_eq!(nav.subcategory_slug(), Some("therapies"));
        assert_eq!(slugs(&nav.procedures()), ["botox", "laser"]);
        assert_eq!(update.params.sub.as_deref(), Some("therapies"));
        assert_eq!(update.params.step, Some(3));
        assert_eq!(update.history, History::Replace);
    }

    #[test]
    fn zero_subcategories_go_straight_to_step_three() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        let update = nav.select_category(RECONSTRUCTIVE);

        assert_eq!(nav.step(), Step::Procedures);
        assert_eq!(nav.subcategory_slug(), None);
        assert_eq!(slugs(&nav.procedures()), ["melanoma"]);
        assert_eq!(update.params.sub, None);
    }

    #[test]
    fn guard_clears_stale_subcategory() {
        let catalog = catalog();
        let params = QueryParams {
            cat: Some(RECONSTRUCTIVE.into()),
            sub: Some("prosopo".into()),
            ..QueryParams::default()
        };
        let mut nav = CatalogNavigator::new(&catalog);
        let update = nav.sync_from_params(&params).expect("stale sub cleared");
        assert_eq!(update.params.sub, None);
        assert_eq!(nav.subcategory_slug(), None);
    }

    #[test]
    fn guard_is_idempotent_and_respects_explicit_choice() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category(NON_INVASIVE);
        assert_eq!(nav.resolve_subcategory(), None);

        nav.select_category(AESTHETIC);
        nav.select_subcategory("soma").expect("category selected");
        assert_eq!(nav.resolve_subcategory(), None);
        assert_eq!(nav.subcategory_slug(), Some("soma"));
    }

    #[test]
    fn back_from_step_three_returns_to_step_two_when_needed() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category(AESTHETIC);
        nav.select_subcategory("prosopo").expect("category selected");

        let update = nav.go_back().expect("category selected");
        assert_eq!(nav.step(), Step::Subcategory);
        assert_eq!(nav.category(), Some(AESTHETIC));
        assert_eq!(nav.subcategory_slug(), None);
        assert_eq!(update.params.step, Some(2));
    }

    #[test]
    fn back_skips_auto_resolved_step() {
        let catalog = catalog();
        for category in [NON_INVASIVE, RECONSTRUCTIVE] {
            let mut nav = CatalogNavigator::new(&catalog);
            nav.select_category(category);
            assert_eq!(nav.step(), Step::Procedures);

            let update = nav.go_back().expect("category selected");
            assert_eq!(nav.step(), Step::Category);
            assert_eq!(nav.selection(), &Selection::default());
            assert_eq!(update.href(), "/catalog?step=1");
        }
    }

    #[test]
    fn back_from_step_two_clears_everything() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category(AESTHETIC);
        nav.go_back().expect("category selected");
        assert_eq!(nav.step(), Step::Category);
    }

    #[test]
    fn back_with_nothing_selected_is_a_no_op() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        assert_eq!(nav.go_back(), None);
    }

    #[test]
    fn subcategory_requires_category() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        assert_eq!(
            nav.select_subcategory("prosopo"),
            Err(NavigationError::NoCategorySelected)
        );
    }

    #[test]
    fn deep_link_without_sub_degrades_to_step_two() {
        let catalog = catalog();
        let params = QueryParams::parse(&format!(
            "{}&step=3",
            serde_urlencoded::to_string(&[("cat", AESTHETIC)]).unwrap()
        ));
        let mut nav = CatalogNavigator::new(&catalog);
        assert_eq!(nav.sync_from_params(&params), None);
        assert_eq!(nav.step(), Step::Subcategory);
    }

    #[test]
    fn deep_link_to_single_subcategory_category_rewrites_url() {
        let catalog = catalog();
        let params = Selection::new(Some(NON_INVASIVE.into()), None).to_params();
        let mut nav = CatalogNavigator::new(&catalog);
        let update = nav.sync_from_params(&params).expect("auto-resolved");
        assert_eq!(update.params.sub.as_deref(), Some("therapies"));
        assert_eq!(update.history, History::Replace);
    }

    #[test]
    fn unknown_slug_yields_empty_state() {
        let catalog = catalog();
        let params = Selection::new(Some(AESTHETIC.into()), Some("nope".into())).to_params();
        let mut nav = CatalogNavigator::new(&catalog);
        assert_eq!(nav.sync_from_params(&params), None);
        assert_eq!(nav.step(), Step::Procedures);
        assert_eq!(nav.subcategory_label().as_deref(), Some("nope"));
        assert!(nav.procedures().is_empty());
    }

    #[test]
    fn unknown_category_yields_empty_state() {
        let catalog = catalog();
        let mut nav = CatalogNavigator::new(&catalog);
        nav.select_category("Άγνωστη");
        assert_eq!(nav.step(), Step::Procedures);
        assert!(nav.procedures().is_empty());
    }

    #[test]
    fn selection_round_trips_for_every_catalog_pair() {
        let catalog = catalog();
        for category in catalog.categories() {
            let nav = {
                let mut nav = CatalogNavigator::new(&catalog);
                nav.select_category(category.label.clone());
                nav
            };
            let mut pairs = vec![Selection::new(Some(category.label.clone()), None)];
            for option in nav.subcategory_options() {
                pairs.push(Selection::new(Some(category.label.clone()), Some(option.slug)));
            }
            for selection in pairs {
                let encoded = selection.to_params().to_query_string();
                let decoded = Selection::from_params(&QueryParams::parse(&encoded));
                assert_eq!(decoded, selection);
            }
        }
    }

    #[test]
    fn text_filter_is_carried_through_transitions() {
        let catalog = catalog();
        let params = QueryParams {
            q: Some("lift".into()),
            ..QueryParams::default()
        };
        let mut nav = CatalogNavigator::from_params(&catalog, &params);
        let update = nav.select_category(AESTHETIC);
        assert_eq!(update.params.q.as_deref(), Some("lift"));
    }

    #[test]
    fn entry_link_is_pushed() {
        let update = CatalogNavigator::entry_update();
        assert_eq!(update.history, History::Push);
        assert_eq!(update.href(), "/catalog");
    }
}
