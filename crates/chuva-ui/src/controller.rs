//! Weather screen controller.
//!
//! Owns the application state and the status line. User actions start
//! service requests; their results come back over a channel and are applied
//! by [`WeatherController::poll_channel`] or [`WeatherController::settle`].
//! A completion is applied only while its request token is still the latest.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chuva_core::{AppError, Config, PreferenceStore, TemperatureUnit};
use chuva_weather::{
    ClientOptions, Coordinates, Endpoints, Geolocator, LocationProvider, Place, WeatherClient,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::autocomplete::{Debouncer, SuggestionList};
use crate::services::{self, ServiceError, WeatherServiceMessage};
use crate::state::{AppState, RequestSequencer};
use crate::status::{self, StatusLine, StatusMessage};
use crate::tour::{self, Tour, TourStep};
use crate::view::{self, Screen};

/// Timing knobs of the presentation layer
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub status_dismiss: Duration,
    pub debounce: Duration,
    pub min_chars: usize,
    pub geolocation_timeout: Duration,
    pub geolocation_max_age: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            status_dismiss: Duration::from_secs(4),
            debounce: Duration::from_millis(200),
            min_chars: 2,
            geolocation_timeout: Duration::from_secs(10),
            geolocation_max_age: Duration::from_secs(60),
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            status_dismiss: Duration::from_secs(config.ui.status_dismiss_secs),
            debounce: Duration::from_millis(config.ui.autocomplete_debounce_ms),
            min_chars: config.ui.autocomplete_min_chars,
            geolocation_timeout: Duration::from_secs(config.location.geolocation_timeout_secs),
            geolocation_max_age: Duration::from_secs(config.location.geolocation_max_age_secs),
        }
    }
}

/// HTTP client settings from the loaded configuration
pub fn client_options(config: &Config) -> ClientOptions {
    ClientOptions {
        endpoints: Endpoints {
            geocoding: config.endpoints.geocoding_url.clone(),
            forecast: config.endpoints.forecast_url.clone(),
            air_quality: config.endpoints.air_quality_url.clone(),
            reverse_geocoding: config.endpoints.reverse_geocoding_url.clone(),
        },
        language: config.weather.language.clone(),
        result_limit: config.weather.result_limit,
        forecast_days: config.weather.forecast_days,
        timeout: Duration::from_secs(config.weather.request_timeout_secs),
        user_agent: config.weather.user_agent.clone(),
    }
}

/// What applying one service message changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A loading step advanced
    Progress(&'static str),
    /// A forecast was applied for the named place
    ForecastReady(String),
    /// The request failed with this user-facing message
    Failed(String),
    /// A superseded completion was dropped
    Stale,
    /// Suggestions are shown
    Suggestions(usize),
    SuggestionsSkipped,
}

pub struct WeatherController<P: LocationProvider + 'static> {
    client: Arc<WeatherClient>,
    geolocator: Arc<Geolocator<P>>,
    preferences: Option<PreferenceStore>,
    sequencer: RequestSequencer,
    suggestion_sequencer: RequestSequencer,
    state: AppState,
    status: StatusLine,
    debouncer: Arc<Debouncer>,
    suggestions: SuggestionList,
    tour: Tour,
    tx: UnboundedSender<WeatherServiceMessage>,
    rx: UnboundedReceiver<WeatherServiceMessage>,
    pending: usize,
}

impl<P: LocationProvider + 'static> WeatherController<P> {
    pub fn new(
        client: WeatherClient,
        provider: P,
        unit: TemperatureUnit,
        settings: &ControllerSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client: Arc::new(client),
            geolocator: Arc::new(Geolocator::new(
                provider,
                settings.geolocation_timeout,
                settings.geolocation_max_age,
            )),
            preferences: None,
            sequencer: RequestSequencer::new(),
            suggestion_sequencer: RequestSequencer::new(),
            state: AppState::new(unit),
            status: StatusLine::new(settings.status_dismiss),
            debouncer: Arc::new(Debouncer::new(settings.debounce, settings.min_chars)),
            suggestions: SuggestionList::default(),
            tour: Tour::new(),
            tx,
            rx,
            pending: 0,
        }
    }

    /// Persist unit changes to `store`.
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.visible()
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn suggestions_mut(&mut self) -> &mut SuggestionList {
        &mut self.suggestions
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn tour_mut(&mut self) -> &mut Tour {
        &mut self.tour
    }

    /// Requests whose final message has not been applied yet
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn screen(&self) -> Option<Screen> {
        view::build_screen(&self.state)
    }

    /// Search by free text. Repeating the last place reuses its coordinates.
    pub fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.status.info(status::EMPTY_QUERY);
            return;
        }

        self.close_suggestions();

        let repeat = self
            .state
            .last_place
            .as_ref()
            .filter(|_| self.state.is_last_place(query))
            .cloned();
        if let Some(place) = repeat {
            tracing::debug!("Query matches last place, skipping geocoding");
            self.run_for_place(place);
            return;
        }

        let token = self.sequencer.next();
        self.status.loading(status::SEARCHING_COORDINATES);
        services::request_search(&self.tx, self.client.clone(), token, query.to_string());
        self.pending += 1;
    }

    /// Fetch the forecast for a known place.
    pub fn run_for_place(&mut self, place: Place) {
        let token = self.sequencer.next();
        tracing::info!(token = token.value(), "Fetching forecast for {}", place.display_name);
        self.status.loading(status::FETCHING_FORECAST);
        services::request_weather_fetch(&self.tx, self.client.clone(), token, place);
        self.pending += 1;
    }

    /// Fetch the forecast for raw coordinates, labelled with `name` or the
    /// coordinates themselves.
    pub fn run_for_coords(&mut self, coords: Coordinates, name: Option<&str>) {
        let label = match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => coords.label(),
        };
        self.run_for_place(Place::new(label, coords));
    }

    /// Use the location provider.
    pub fn locate(&mut self) {
        let token = self.sequencer.next();
        self.status.loading(status::REQUESTING_LOCATION);
        services::request_locate(&self.tx, self.client.clone(), self.geolocator.clone(), token);
        self.pending += 1;
    }

    pub fn location_available(&self) -> bool {
        self.geolocator.is_available()
    }

    /// One keystroke in the search box.
    pub fn suggest(&mut self, text: &str) {
        if self.debouncer.is_too_short(text) {
            self.close_suggestions();
            return;
        }
        let token = self.suggestion_sequencer.next();
        services::request_suggestions(
            &self.tx,
            self.client.clone(),
            self.debouncer.clone(),
            token,
            text.to_string(),
        );
        self.pending += 1;
    }

    /// Run the highlighted suggestion. Returns false when none is highlighted.
    pub fn choose_suggestion(&mut self) -> bool {
        match self.suggestions.choose() {
            Some(place) => {
                self.close_suggestions();
                self.run_for_place(place);
                true
            }
            None => false,
        }
    }

    /// Hide the list and drop lookups still in flight.
    fn close_suggestions(&mut self) {
        self.debouncer.cancel();
        self.suggestion_sequencer.invalidate();
        self.suggestions.hide();
    }

    /// Show one day of the week. Unknown dates leave the view unchanged.
    pub fn select_day(&mut self, date: NaiveDate) -> bool {
        let known = self
            .state
            .week
            .as_ref()
            .is_some_and(|w| w.days.iter().any(|d| d.date == date));
        if known {
            self.state.selected_date = Some(date);
        } else {
            tracing::debug!("No forecast day {}", date);
        }
        known
    }

    pub fn show_now(&mut self) {
        self.state.selected_date = None;
    }

    /// Change the display unit and persist it. A failed save only logs.
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.state.unit = unit;
        if let Some(store) = &self.preferences {
            if let Err(e) = store.save(unit) {
                tracing::warn!("Failed to save temperature unit: {:#}", e);
            }
        }
    }

    /// Start the guided tour over what is on screen now.
    pub fn start_tour(&mut self) -> Option<TourStep> {
        let screen = self.screen();
        let sections = tour::present_sections(screen.as_ref(), self.location_available());
        let step = self.tour.start(&sections);
        if step.is_none() {
            self.status.info(tour::NOTHING_TO_SHOW);
        }
        step
    }

    /// Apply one message, if any is waiting.
    pub fn poll_channel(&mut self) -> Option<Update> {
        let msg = self.rx.try_recv().ok()?;
        Some(self.apply(msg))
    }

    /// Wait until every request issued so far has finished, applying
    /// messages as they arrive.
    pub async fn settle(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while self.pending > 0 {
            match self.rx.recv().await {
                Some(msg) => updates.push(self.apply(msg)),
                None => break,
            }
        }
        updates
    }

    fn apply(&mut self, msg: WeatherServiceMessage) -> Update {
        if msg.is_final() {
            self.pending = self.pending.saturating_sub(1);
        }

        match msg {
            WeatherServiceMessage::Progress { token, status } => {
                if !self.sequencer.is_current(token) {
                    return Update::Stale;
                }
                self.status.loading(status);
                Update::Progress(status)
            }
            WeatherServiceMessage::FetchDone { token, result } => {
                if !self.sequencer.is_current(token) {
                    tracing::debug!("[seq] discarding stale response {}", token.value());
                    return Update::Stale;
                }
                match result {
                    Ok(bundle) => {
                        let name = bundle.place.display_name.clone();
                        self.state.apply_bundle(bundle);
                        self.status.clear();
                        tracing::info!("Forecast applied for {}", name);
                        Update::ForecastReady(name)
                    }
                    Err(e) => self.fail(e),
                }
            }
            WeatherServiceMessage::SuggestionsDone {
                token,
                query,
                places,
            } => {
                if !self.suggestion_sequencer.is_current(token) {
                    tracing::debug!("[ac] discarding stale suggestions for {}", query);
                    return Update::Stale;
                }
                tracing::debug!("[ac] {} suggestions for {}", places.len(), query);
                let count = places.len();
                self.suggestions.show(places);
                Update::Suggestions(count)
            }
            WeatherServiceMessage::SuggestionsSkipped => Update::SuggestionsSkipped,
        }
    }

    /// Previous data stays on screen; only the status line changes.
    fn fail(&mut self, e: ServiceError) -> Update {
        let is_location = matches!(e, ServiceError::Location(_));
        tracing::error!("Request failed: {}", e);

        let app: AppError = e.into();
        let message = app.user_message();
        if is_location {
            self.status.alert(message);
        } else {
            self.status.error(message);
        }
        Update::Failed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ViewMode;
    use crate::status::StatusKind;
    use chuva_weather::{ConfiguredLocation, FixedLocation, NoLocation};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new(ClientOptions {
            endpoints: Endpoints::with_base_url(&server.uri()),
            ..ClientOptions::default()
        })
        .unwrap()
    }

    fn controller<P: LocationProvider + 'static>(server: &MockServer, provider: P) -> WeatherController<P> {
        WeatherController::new(
            client(server),
            provider,
            TemperatureUnit::Celsius,
            &ControllerSettings {
                debounce: Duration::from_millis(1),
                ..ControllerSettings::default()
            },
        )
    }

    fn forecast_body(timezone: &str) -> serde_json::Value {
        serde_json::json!({
            "timezone": timezone,
            "current": { "time": "2024-05-01T10:00", "temperature_2m": 25.0 },
            "hourly": {
                "time": ["2024-05-01T10:00", "2024-05-01T11:00"],
                "precipitation": [0.0, 0.0],
                "precipitation_probability": [10, 10]
            },
            "daily": {
                "time": ["2024-05-01", "2024-05-02"],
                "precipitation_sum": [0.0, 8.0],
                "sunrise": ["2024-05-01T06:00", "2024-05-02T06:00"],
                "sunset": ["2024-05-01T18:00", "2024-05-02T18:00"]
            }
        })
    }

    fn geocode_body(name: &str, lat: f64) -> serde_json::Value {
        serde_json::json!({
            "results": [{
                "name": name, "country": "Brasil",
                "latitude": lat, "longitude": -40.0, "timezone": "America/Sao_Paulo"
            }]
        })
    }

    async fn mount_city(server: &MockServer, name: &str, lat: f64, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(name, lat)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", lat.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast_body(name))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    async fn mount_air_quality(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/air-quality"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "current": { "us_aqi": 30 } })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_applies_forecast() {
        let server = MockServer::start().await;
        mount_city(&server, "Vitória", -20.3, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.search("  Vitória ");
        assert!(c.status().unwrap().kind == StatusKind::Loading);

        let updates = c.settle().await;
        assert_eq!(
            updates,
            vec![
                Update::Progress(status::FETCHING_FORECAST),
                Update::ForecastReady("Vitória, Brasil".into())
            ]
        );
        assert!(c.status().is_none());
        assert_eq!(c.pending(), 0);

        let screen = c.screen().unwrap();
        assert_eq!(screen.summary.location, "Vitória, Brasil");
        assert_eq!(screen.summary.aqi, "30 • Bom");
        assert_eq!(c.state().week.as_ref().unwrap().rainy_days, 1);
    }

    #[tokio::test]
    async fn test_empty_query_only_sets_status() {
        let server = MockServer::start().await;
        let mut c = controller(&server, NoLocation);
        c.search("   ");

        let status = c.status().unwrap();
        assert_eq!(status.text, status::EMPTY_QUERY);
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(c.pending(), 0);
    }

    #[tokio::test]
    async fn test_not_found_keeps_previous_data() {
        let server = MockServer::start().await;
        mount_city(&server, "Vitória", -20.3, Duration::ZERO).await;
        mount_air_quality(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Xyzzy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let mut c = controller(&server, NoLocation);
        c.search("Vitória");
        c.settle().await;
        c.search("Xyzzy");
        let updates = c.settle().await;

        assert_eq!(updates, vec![Update::Failed("Local não encontrado".into())]);
        assert_eq!(c.status().unwrap().text, "Erro: Local não encontrado");
        assert_eq!(
            c.state().last_place.as_ref().unwrap().display_name,
            "Vitória, Brasil"
        );
        assert!(c.screen().is_some());
    }

    #[tokio::test]
    async fn test_repeat_of_last_place_skips_geocoding() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body("Ilhéus", -14.8)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Ilhéus")))
            .expect(2)
            .mount(&server)
            .await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.search("Ilhéus");
        c.settle().await;
        c.search("Ilhéus, Brasil");
        assert_eq!(c.status().unwrap().text, status::FETCHING_FORECAST);
        let updates = c.settle().await;
        assert_eq!(updates, vec![Update::ForecastReady("Ilhéus, Brasil".into())]);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let server = MockServer::start().await;
        mount_city(&server, "Lenta", -10.0, Duration::from_millis(300)).await;
        mount_city(&server, "Rápida", -11.0, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.search("Lenta");
        c.search("Rápida");
        let updates = c.settle().await;

        assert!(updates.contains(&Update::ForecastReady("Rápida, Brasil".into())));
        assert!(updates.contains(&Update::Stale));
        assert!(!updates.contains(&Update::ForecastReady("Lenta, Brasil".into())));
        assert_eq!(c.state().bundle.as_ref().unwrap().timezone(), "Rápida");
    }

    #[tokio::test]
    async fn test_locate_without_provider() {
        let server = MockServer::start().await;
        let mut c = controller(&server, ConfiguredLocation::from_position(None));
        assert!(!c.location_available());

        c.locate();
        assert_eq!(c.status().unwrap().text, status::REQUESTING_LOCATION);
        let updates = c.settle().await;

        assert_eq!(
            updates,
            vec![Update::Failed("Não foi possível obter a localização".into())]
        );
        let status = c.status().unwrap();
        assert_eq!(status.text, "Não foi possível obter a localização");
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[tokio::test]
    async fn test_locate_names_position() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": { "town": "Paraty", "country": "Brasil" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("auto")))
            .mount(&server)
            .await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, FixedLocation(Coordinates::new(-23.2, -44.7)));
        c.locate();
        let updates = c.settle().await;
        assert_eq!(
            updates,
            vec![
                Update::Progress(status::RESOLVING_PLACE_NAME),
                Update::Progress(status::FETCHING_FORECAST),
                Update::ForecastReady("Paraty, Brasil".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_for_coords_label() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("auto")))
            .mount(&server)
            .await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.run_for_coords(Coordinates::new(-3.73, -38.52), None);
        assert_eq!(
            c.settle().await,
            vec![Update::ForecastReady("Lat -3.73, Lon -38.52".into())]
        );
    }

    #[tokio::test]
    async fn test_suggestions_then_choose() {
        let server = MockServer::start().await;
        mount_city(&server, "Olinda", -8.0, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.suggest("O");
        assert_eq!(c.pending(), 0);

        c.suggest("Olinda");
        assert_eq!(c.settle().await, vec![Update::Suggestions(1)]);
        assert!(!c.choose_suggestion());

        c.suggestions_mut().move_down();
        assert!(c.choose_suggestion());
        assert!(!c.suggestions().is_visible());
        assert_eq!(
            c.settle().await,
            vec![Update::ForecastReady("Olinda, Brasil".into())]
        );
    }

    async fn mount_suggestions(server: &MockServer, query: &str, names: &[&str], delay: Duration) {
        let results: Vec<_> = names
            .iter()
            .map(|n| {
                serde_json::json!({
                    "name": n, "country": "Brasil",
                    "latitude": -12.0, "longitude": -38.0, "timezone": "America/Bahia"
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", query))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "results": results }))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_older_suggestions_do_not_replace_newer() {
        let server = MockServer::start().await;
        mount_suggestions(
            &server,
            "Sal",
            &["Salto", "Salinas", "Salgueiro"],
            Duration::from_millis(400),
        )
        .await;
        mount_suggestions(&server, "Salvador", &["Salvador"], Duration::ZERO).await;

        let mut c = controller(&server, NoLocation);
        c.suggest("Sal");
        tokio::time::sleep(Duration::from_millis(50)).await;
        c.suggest("Salvador");

        let updates = c.settle().await;
        assert_eq!(updates, vec![Update::Suggestions(1), Update::Stale]);
        let shown: Vec<_> = c
            .suggestions()
            .places()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(shown, vec!["Salvador, Brasil"]);
    }

    #[tokio::test]
    async fn test_search_keeps_suggestions_closed() {
        let server = MockServer::start().await;
        mount_suggestions(&server, "Olin", &["Olinda"], Duration::from_millis(300)).await;
        mount_city(&server, "Olinda", -8.0, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.suggest("Olin");
        tokio::time::sleep(Duration::from_millis(50)).await;
        c.search("Olinda");

        let updates = c.settle().await;
        assert!(updates.contains(&Update::ForecastReady("Olinda, Brasil".into())));
        assert_eq!(updates.last(), Some(&Update::Stale));
        assert!(!c.suggestions().is_visible());
    }

    #[tokio::test]
    async fn test_day_selection() {
        let server = MockServer::start().await;
        mount_city(&server, "Vitória", -20.3, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert!(!c.select_day(day));

        c.search("Vitória");
        c.settle().await;
        assert!(c.select_day(day));
        assert_eq!(c.state().mode(), ViewMode::Day(day));
        assert!(!c.select_day(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        assert_eq!(c.state().mode(), ViewMode::Day(day));

        c.show_now();
        assert_eq!(c.state().mode(), ViewMode::Now);
    }

    #[tokio::test]
    async fn test_set_unit_persists() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path());

        let mut c = controller(&server, NoLocation).with_preferences(store.clone());
        c.set_unit(TemperatureUnit::Kelvin);

        assert_eq!(c.state().unit, TemperatureUnit::Kelvin);
        assert_eq!(store.load(), TemperatureUnit::Kelvin);
    }

    #[tokio::test]
    async fn test_tour_depends_on_screen() {
        let server = MockServer::start().await;
        mount_city(&server, "Vitória", -20.3, Duration::ZERO).await;
        mount_air_quality(&server).await;

        let mut c = controller(&server, NoLocation);
        c.start_tour();
        assert_eq!(c.tour().steps().len(), 3);

        c.search("Vitória");
        c.settle().await;
        c.start_tour();
        assert_eq!(c.tour().steps().len(), 8);
        assert!(c.tour().is_active());
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config::default();
        let settings = ControllerSettings::from_config(&config);
        assert_eq!(settings.status_dismiss, Duration::from_secs(4));
        assert_eq!(settings.debounce, Duration::from_millis(200));

        let options = client_options(&config);
        assert_eq!(options.language, "pt");
        assert_eq!(options.endpoints, Endpoints::default());
    }
}
