//! Guided tour over the sections currently on screen.

use crate::view::Screen;

pub const NOTHING_TO_SHOW: &str = "Nada para mostrar no guia agora.";

/// Screen sections a tour step can point at, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Guide,
    Search,
    Location,
    Status,
    Summary,
    Chart,
    WeekSummary,
    ThemeLabel,
    WeekGrid,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Guide,
        Section::Search,
        Section::Location,
        Section::Status,
        Section::Summary,
        Section::Chart,
        Section::WeekSummary,
        Section::ThemeLabel,
        Section::WeekGrid,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            Section::Guide => {
                "O guia interativo fica sempre disponível com --guide. Use-o quando quiser rever o passo a passo."
            }
            Section::Search => {
                "Pesquise uma cidade ou endereço. As sugestões aparecem conforme você digita."
            }
            Section::Location => "Prefere rapidez? Use --here para consultar a sua localização atual.",
            Section::Status => "A linha de status indica carregamento, erros e dicas durante a busca.",
            Section::Summary => {
                "Aqui está a resposta \"vai chover?\", além da temperatura, vento e acumulados das próximas horas."
            }
            Section::Chart => "O gráfico mostra a probabilidade de chuva hora a hora.",
            Section::WeekSummary => {
                "O resumo semanal conta quantos dias têm chuva e entrega o veredito da semana."
            }
            Section::ThemeLabel => {
                "Este rótulo mostra o tema visual aplicado conforme o clima predominante."
            }
            Section::WeekGrid => {
                "Cada cartão diário traz emoji de tempo, precipitação, probabilidade e barra de confiança."
            }
        }
    }
}

/// Sections present for the current screen. Data sections need a loaded
/// forecast; the location step needs a location source.
pub fn present_sections(screen: Option<&Screen>, location_available: bool) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| match section {
            Section::Guide | Section::Search | Section::Status => true,
            Section::Location => location_available,
            Section::Summary | Section::Chart => screen.is_some(),
            Section::WeekSummary | Section::ThemeLabel | Section::WeekGrid => {
                screen.is_some_and(|s| s.week.is_some())
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourStep {
    pub section: Section,
    pub text: &'static str,
}

#[derive(Debug, Default)]
pub struct Tour {
    steps: Vec<TourStep>,
    index: Option<usize>,
}

impl Tour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build steps for `present` and show the first one. `None` when there
    /// is nothing to show.
    pub fn start(&mut self, present: &[Section]) -> Option<TourStep> {
        self.steps = present
            .iter()
            .map(|&section| TourStep {
                section,
                text: section.text(),
            })
            .collect();
        tracing::info!("[tour] {} steps built", self.steps.len());

        if self.steps.is_empty() {
            self.index = None;
            return None;
        }
        self.go(0)
    }

    /// Advance. Past the last step the tour ends.
    pub fn next(&mut self) -> Option<TourStep> {
        match self.index {
            Some(i) => self.go(i + 1),
            None => None,
        }
    }

    /// Step back, staying on the first step.
    pub fn prev(&mut self) -> Option<TourStep> {
        let i = self.index?;
        self.go(i.saturating_sub(1))
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    pub fn current(&self) -> Option<TourStep> {
        self.steps.get(self.index?).copied()
    }

    pub fn is_active(&self) -> bool {
        self.index.is_some()
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    /// Label of the forward action on the current step
    pub fn next_label(&self) -> &'static str {
        match self.index {
            Some(i) if i + 1 == self.steps.len() => "Concluir",
            _ => "Próximo",
        }
    }

    pub fn shows_prev(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    fn go(&mut self, i: usize) -> Option<TourStep> {
        if i >= self.steps.len() {
            self.close();
            return None;
        }
        self.index = Some(i);
        self.current()
    }
}
