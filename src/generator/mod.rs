//! Generator controller
//!
//! Drives the two-step creation flow: prompt → candidate images →
//! platform and overlay → download. `GeneratorState` holds the view-state
//! and is pure; `GeneratorController` pairs it with the API client.
//!
//! @module generator

pub mod overlay;
pub mod platform;
pub mod transition;

use crate::api::types::{
    DownloadRequest, GenerateRequest, GenerateResponse, PlatformMap, SelectionRequest,
};
use crate::api::ApiClient;
use crate::core::error::{Error, Result};
use overlay::OverlayForm;
use platform::{CustomInputs, PlatformCatalog, CUSTOM, DEFAULT_PLATFORM};
use tracing::{info, warn};
use transition::PageTransition;

pub use crate::api::types::Dimensions;

pub const GENERATE_LABEL: &str = "✨ Generate Images";
pub const GENERATING_LABEL: &str = "Generating...";
pub const DOWNLOAD_LABEL: &str = "⬇ Download Image";
pub const DOWNLOADING_LABEL: &str = "Downloading...";

// =============================================================================
// VIEW STATE
// =============================================================================

/// Top-level page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Input,
    Result,
}

/// Sub-view of the result page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    /// Grid of candidates ("choose an image")
    Selection,
    /// Split view with the chosen image, platforms and overlay
    Preview,
}

/// Input form of the first step
#[derive(Debug, Clone, Default)]
pub struct GenerateForm {
    pub custom_prompt: String,
    pub article_title: String,
    pub draft_link: String,
    pub style: String,
}

impl GenerateForm {
    /// Validate and build the request; the custom prompt wins over the title
    pub fn to_request(&self) -> Result<GenerateRequest> {
        let prompt = self.custom_prompt.trim();
        let title = self.article_title.trim();
        let draft_link = self.draft_link.trim();

        if prompt.is_empty() && title.is_empty() {
            return Err(Error::validation(
                "Please enter either a custom prompt or an article title.",
            ));
        }

        Ok(GenerateRequest {
            title: if prompt.is_empty() { title } else { prompt }.to_string(),
            style: self.style.clone(),
            draft_link: (!draft_link.is_empty()).then(|| draft_link.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub url: String,
}

/// One generation job and the user's pick among its images
#[derive(Debug, Clone)]
pub struct GenerationSession {
    pub generation_id: String,
    pub images: Vec<String>,
    selected: Option<Selection>,
}

impl GenerationSession {
    pub fn new(response: GenerateResponse) -> Self {
        Self {
            generation_id: response.generation_id,
            images: response.images,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    /// Replace any previous pick
    pub fn select(&mut self, index: usize) -> Result<&Selection> {
        let url = self
            .images
            .get(index)
            .ok_or_else(|| Error::validation(format!("There is no image #{}", index + 1)))?
            .clone();
        Ok(self.selected.insert(Selection { index, url }))
    }
}

/// Everything the generator page shows
#[derive(Debug, Clone)]
pub struct GeneratorState {
    step: Step,
    result_view: ResultView,
    styles: Vec<String>,
    catalog: PlatformCatalog,
    platform: String,
    pub custom: CustomInputs,
    pub overlay: OverlayForm,
    session: Option<GenerationSession>,
    generating: bool,
    downloading: bool,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            step: Step::Input,
            result_view: ResultView::Selection,
            styles: Vec::new(),
            catalog: PlatformCatalog::default(),
            platform: DEFAULT_PLATFORM.to_string(),
            custom: CustomInputs::default(),
            overlay: OverlayForm::default(),
            session: None,
            generating: false,
            downloading: false,
        }
    }
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_catalog(&mut self, styles: Vec<String>, platforms: PlatformMap) {
        self.styles = styles;
        self.catalog = PlatformCatalog::new(platforms);
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn result_view(&self) -> ResultView {
        self.result_view
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn catalog(&self) -> &PlatformCatalog {
        &self.catalog
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn session(&self) -> Option<&GenerationSession> {
        self.session.as_ref()
    }

    pub fn custom_inputs_visible(&self) -> bool {
        self.platform == CUSTOM
    }

    pub fn generate_label(&self) -> &'static str {
        if self.generating {
            GENERATING_LABEL
        } else {
            GENERATE_LABEL
        }
    }

    pub fn download_label(&self) -> &'static str {
        if self.downloading {
            DOWNLOADING_LABEL
        } else {
            DOWNLOAD_LABEL
        }
    }

    /// Size shown on the preview label
    pub fn preview_dimensions(&self) -> Option<Dimensions> {
        if self.platform == CUSTOM {
            Some(self.custom.preview())
        } else {
            self.catalog.get(&self.platform)
        }
    }

    /// Switch platform; the overlay form is left as it is
    pub fn set_platform(&mut self, name: &str) -> Result<Dimensions> {
        if !self.catalog.contains(name) {
            return Err(Error::validation(format!("Unknown platform '{}'", name)));
        }
        self.platform = name.to_string();
        self.preview_dimensions()
            .ok_or_else(|| Error::validation(format!("Unknown platform '{}'", name)))
    }

    /// Edit the custom inputs; returns the new preview size while Custom is active
    pub fn set_custom_dimensions(
        &mut self,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Option<Dimensions> {
        if let Some(w) = width {
            self.custom.width = w.to_string();
        }
        if let Some(h) = height {
            self.custom.height = h.to_string();
        }
        (self.platform == CUSTOM).then(|| self.custom.preview())
    }

    /// Move between steps; returns None when already there
    pub fn navigate_to(&mut self, target: Step) -> Option<PageTransition> {
        if self.step == target {
            return None;
        }

        if target == Step::Input {
            self.result_view = ResultView::Selection;
            self.session = None;
        }

        let forward = target == Step::Result;
        self.step = target;
        Some(PageTransition::new(forward))
    }

    /// Validate the form and mark a generation as in flight
    pub fn begin_generate(&mut self, form: &GenerateForm) -> Result<GenerateRequest> {
        let request = form.to_request()?;
        if self.generating {
            return Err(Error::Busy);
        }
        self.generating = true;
        Ok(request)
    }

    /// Apply the server's answer; on failure nothing but the busy flag changes
    pub fn finish_generate(&mut self, outcome: Result<GenerateResponse>) -> Result<usize> {
        self.generating = false;
        let response = outcome.map_err(|e| e.with_api_prefix("Error generating images: "))?;

        let count = response.images.len();
        self.session = Some(GenerationSession::new(response));
        self.result_view = ResultView::Selection;
        self.navigate_to(Step::Result);
        Ok(count)
    }

    /// Pick a candidate and open the preview at the default platform
    pub fn select_image(&mut self, index: usize) -> Result<Selection> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::validation("Generate images before selecting one."))?;
        let selection = session.select(index)?.clone();

        self.platform = DEFAULT_PLATFORM.to_string();
        self.result_view = ResultView::Preview;
        Ok(selection)
    }

    pub fn back_to_selection(&mut self) {
        self.result_view = ResultView::Selection;
    }

    /// Build the download body, or fail locally without a request
    pub fn download_request(&self) -> Result<DownloadRequest> {
        let (session, selection) = self
            .session
            .as_ref()
            .and_then(|s| s.selected().map(|sel| (s, sel)))
            .ok_or_else(|| Error::validation("No image selected for download."))?;

        let custom_dims = if self.platform == CUSTOM {
            Some(self.custom.validate()?)
        } else {
            None
        };

        Ok(DownloadRequest {
            generation_id: session.generation_id.clone(),
            selected_image_index: selection.index,
            platform: self.platform.clone(),
            custom_dims,
            text_overlay: self.overlay.to_overlay(),
        })
    }

    pub fn begin_download(&mut self) -> Result<DownloadRequest> {
        let request = self.download_request()?;
        if self.downloading {
            return Err(Error::Busy);
        }
        self.downloading = true;
        Ok(request)
    }

    pub fn finish_download(&mut self, outcome: Result<Vec<u8>>) -> Result<DownloadedImage> {
        self.downloading = false;
        let bytes = outcome.map_err(|e| e.with_api_prefix("Error downloading image: "))?;
        Ok(DownloadedImage {
            filename: download_filename(&self.platform),
            bytes,
        })
    }
}

/// Image bytes and the name to save them under
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn download_filename(platform: &str) -> String {
    format!("blog-cover-{}.png", platform.to_lowercase())
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct GeneratorController {
    api: ApiClient,
    state: GeneratorState,
}

impl GeneratorController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: GeneratorState::new(),
        }
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GeneratorState {
        &mut self.state
    }

    /// Fetch styles and platforms; failures are logged and leave lists empty
    pub async fn load_catalog(&mut self) {
        let (styles, platforms) = futures::join!(self.api.styles(), self.api.platforms());

        let styles = styles.unwrap_or_else(|e| {
            warn!("Error fetching styles: {}", e);
            Vec::new()
        });
        let platforms = platforms.unwrap_or_else(|e| {
            warn!("Error fetching platforms: {}", e);
            PlatformMap::new()
        });

        self.state.load_catalog(styles, platforms);
    }

    /// Generate candidates; returns how many are selectable
    pub async fn generate(&mut self, form: &GenerateForm) -> Result<usize> {
        let request = self.state.begin_generate(form)?;
        info!(title = %request.title, style = %request.style, "Generating images");
        let outcome = self.api.generate(&request).await;
        self.state.finish_generate(outcome)
    }

    pub fn select_image(&mut self, index: usize) -> Result<Selection> {
        self.state.select_image(index)
    }

    pub async fn download(&mut self) -> Result<DownloadedImage> {
        let request = self.state.begin_download()?;
        let outcome = self.api.download(&request).await;
        self.state.finish_download(outcome)
    }

    /// Store the pick in the user's dashboard (logged-in sessions)
    pub async fn save_selection(&self) -> Result<String> {
        let request = self.selection_request()?;
        let response = self.api.save_selection(&request).await?;
        if response.success {
            Ok(response
                .message
                .unwrap_or_else(|| "Image saved successfully".to_string()))
        } else {
            Err(Error::api(
                response
                    .error
                    .unwrap_or_else(|| "Failed to save image".to_string()),
            ))
        }
    }

    /// Remember the pick server-side so it survives signing up
    pub async fn remember_selection(&self) -> Result<()> {
        let request = self.selection_request()?;
        self.api.update_selection(&request).await?;
        Ok(())
    }

    fn selection_request(&self) -> Result<SelectionRequest> {
        let session = self
            .state
            .session()
            .ok_or_else(|| Error::validation("No image selected."))?;
        let selection = session
            .selected()
            .ok_or_else(|| Error::validation("No image selected."))?;
        Ok(SelectionRequest {
            generation_id: session.generation_id.clone(),
            selected_index: selection.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Anchor;

    fn platforms() -> PlatformMap {
        let mut map = PlatformMap::new();
        map.insert("Hashnode".to_string(), Dimensions::new(1600, 840));
        map.insert("Dev.to".to_string(), Dimensions::new(1000, 420));
        map.insert("Medium".to_string(), Dimensions::new(1500, 750));
        map.insert("Custom".to_string(), Dimensions::new(0, 0));
        map
    }

    fn response() -> GenerateResponse {
        GenerateResponse {
            generation_id: "g1".to_string(),
            images: vec!["/i/1.png".to_string(), "/i/2.png".to_string()],
        }
    }

    fn ready_state() -> GeneratorState {
        let mut state = GeneratorState::new();
        state.load_catalog(vec!["Creative".to_string()], platforms());
        state
    }

    fn form(title: &str) -> GenerateForm {
        GenerateForm {
            article_title: title.to_string(),
            style: "Creative".to_string(),
            ..GenerateForm::default()
        }
    }

    #[test]
    fn test_form_requires_prompt_or_title() {
        let err = GenerateForm::default().to_request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter either a custom prompt or an article title."
        );
    }

    #[test]
    fn test_custom_prompt_wins_and_fields_trimmed() {
        let form = GenerateForm {
            custom_prompt: "  a neon city  ".to_string(),
            article_title: "Ignored".to_string(),
            draft_link: "   ".to_string(),
            style: "Tech".to_string(),
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.title, "a neon city");
        assert_eq!(req.draft_link, None);
    }

    #[test]
    fn test_generate_success_moves_to_selection() {
        let mut state = ready_state();
        state.begin_generate(&form("Rust tips")).unwrap();
        assert_eq!(state.generate_label(), GENERATING_LABEL);

        let count = state.finish_generate(Ok(response())).unwrap();
        assert_eq!(count, 2);
        assert_eq!(state.step(), Step::Result);
        assert_eq!(state.result_view(), ResultView::Selection);
        assert_eq!(state.generate_label(), GENERATE_LABEL);
        assert_eq!(state.session().unwrap().images.len(), 2);
    }

    #[test]
    fn test_second_generate_rejected_while_busy() {
        let mut state = ready_state();
        state.begin_generate(&form("One")).unwrap();
        assert!(matches!(state.begin_generate(&form("Two")), Err(Error::Busy)));
    }

    #[test]
    fn test_generate_failure_leaves_state_unchanged() {
        let mut state = ready_state();
        state.begin_generate(&form("Rust tips")).unwrap();
        let err = state
            .finish_generate(Err(Error::api("model overloaded")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Error generating images: model overloaded");
        assert_eq!(state.step(), Step::Input);
        assert!(state.session().is_none());
        assert_eq!(state.generate_label(), GENERATE_LABEL);
    }

    #[test]
    fn test_catalog_platforms_use_stored_dimensions() {
        let mut state = ready_state();
        for (name, dims) in platforms() {
            if name == CUSTOM {
                continue;
            }
            assert_eq!(state.set_platform(&name).unwrap(), dims);
            assert!(!state.custom_inputs_visible());
        }
    }

    #[test]
    fn test_custom_platform_defaults() {
        let mut state = ready_state();
        assert_eq!(state.set_platform(CUSTOM).unwrap(), Dimensions::new(1200, 630));
        assert!(state.custom_inputs_visible());
        assert_eq!(
            state.set_custom_dimensions(Some("900"), None),
            Some(Dimensions::new(900, 630))
        );

        state.set_platform("Medium").unwrap();
        assert_eq!(state.set_custom_dimensions(Some("700"), None), None);
    }

    #[test]
    fn test_platform_switch_keeps_overlay() {
        let mut state = ready_state();
        state.overlay.text = "Hello".to_string();
        state.overlay.position = Anchor::TopRight;
        state.set_platform(CUSTOM).unwrap();
        state.set_platform("Dev.to").unwrap();
        assert_eq!(state.overlay.text, "Hello");
        assert_eq!(state.overlay.position, Anchor::TopRight);
    }

    #[test]
    fn test_unknown_platform_rejected() {
        let mut state = ready_state();
        assert!(state.set_platform("Myspace").is_err());
        assert_eq!(state.platform(), DEFAULT_PLATFORM);
    }

    #[test]
    fn test_single_selection() {
        let mut state = ready_state();
        state.begin_generate(&form("x")).unwrap();
        state.finish_generate(Ok(response())).unwrap();
        state.set_platform("Medium").unwrap();

        state.select_image(0).unwrap();
        let sel = state.select_image(1).unwrap();
        assert_eq!(sel.url, "/i/2.png");
        assert_eq!(state.session().unwrap().selected().unwrap().index, 1);
        assert_eq!(state.platform(), DEFAULT_PLATFORM);
        assert_eq!(state.result_view(), ResultView::Preview);

        assert!(state.select_image(2).is_err());
        assert_eq!(state.session().unwrap().selected().unwrap().index, 1);
    }

    #[test]
    fn test_download_guards() {
        let mut state = ready_state();
        let err = state.download_request().unwrap_err();
        assert_eq!(err.to_string(), "No image selected for download.");

        state.begin_generate(&form("x")).unwrap();
        state.finish_generate(Ok(response())).unwrap();
        assert!(state.download_request().is_err());

        state.select_image(0).unwrap();
        state.set_platform(CUSTOM).unwrap();
        let err = state.download_request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please specify valid width and height (minimum 100px)."
        );

        state.set_custom_dimensions(Some("1200"), Some("99"));
        assert!(state.download_request().is_err());

        state.set_custom_dimensions(None, Some("600"));
        let req = state.download_request().unwrap();
        assert_eq!(req.custom_dims, Some(Dimensions::new(1200, 600)));
        assert_eq!(req.platform, "Custom");
    }

    #[test]
    fn test_download_request_carries_overlay() {
        let mut state = ready_state();
        state.begin_generate(&form("x")).unwrap();
        state.finish_generate(Ok(response())).unwrap();
        state.select_image(1).unwrap();

        let req = state.download_request().unwrap();
        assert_eq!(req.generation_id, "g1");
        assert_eq!(req.selected_image_index, 1);
        assert_eq!(req.platform, "Hashnode");
        assert!(req.custom_dims.is_none());
        assert!(req.text_overlay.is_none());

        state.overlay.text = "Title".to_string();
        let req = state.download_request().unwrap();
        assert_eq!(req.text_overlay.unwrap().text, "Title");
    }

    #[test]
    fn test_finish_download_names_file() {
        let mut state = ready_state();
        state.set_platform("Dev.to").unwrap();
        let image = state.finish_download(Ok(vec![1, 2, 3])).unwrap();
        assert_eq!(image.filename, "blog-cover-dev.to.png");
        assert_eq!(state.download_label(), DOWNLOAD_LABEL);

        let err = state.finish_download(Err(Error::api("gone"))).unwrap_err();
        assert_eq!(err.to_string(), "Error downloading image: gone");
    }

    #[test]
    fn test_back_to_input_resets_result_view() {
        let mut state = ready_state();
        state.begin_generate(&form("x")).unwrap();
        state.finish_generate(Ok(response())).unwrap();
        state.select_image(0).unwrap();
        assert_eq!(state.result_view(), ResultView::Preview);

        let t = state.navigate_to(Step::Input).unwrap();
        assert!(!t.forward);
        assert_eq!(state.result_view(), ResultView::Selection);
        assert!(state.session().is_none());
        assert!(state.navigate_to(Step::Input).is_none());
    }

    #[test]
    fn test_back_to_selection_keeps_pick() {
        let mut state = ready_state();
        state.begin_generate(&form("x")).unwrap();
        state.finish_generate(Ok(response())).unwrap();
        state.select_image(1).unwrap();
        state.back_to_selection();
        assert_eq!(state.result_view(), ResultView::Selection);
        assert_eq!(state.session().unwrap().selected().unwrap().index, 1);
    }
}
