use std::sync::Arc;

use crate::app::RoutesConfig;
use crate::panels::error::PanelResult;
use crate::panels::loader::PanelLoader;
use crate::panels::model::{
    ChatHistoryResponse, ClientsResponse, FaqsResponse, MonthlyReport, PingResponse,
};
use crate::panels::region::{ChartSink, Region};
use crate::panels::render::{
    empty_message, render_clients, render_conversations, render_faqs, report_chart,
    NO_REPORT_MESSAGE,
};
use crate::panels::LOGGER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelOutcome {
    Loaded,
    Failed,
    /// The page has no region for this panel (or no conversation id).
    Skipped,
}

impl<T> From<&PanelResult<T>> for PanelOutcome {
    fn from(result: &PanelResult<T>) -> Self {
        match result {
            Ok(_) => PanelOutcome::Loaded,
            Err(_) => PanelOutcome::Failed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardSummary {
    pub clients: PanelOutcome,
    pub faqs: PanelOutcome,
    pub conversations: PanelOutcome,
    pub report: PanelOutcome,
}

struct ConversationPanel {
    region: Arc<dyn Region>,
    wa_id: Option<String>,
}

struct ReportPanel {
    region: Arc<dyn Region>,
    chart: Arc<dyn ChartSink>,
}

/// The dashboard page: whichever panels the page has, each loaded once.
pub struct Dashboard {
    loader: PanelLoader,
    routes: RoutesConfig,
    clients: Option<Arc<dyn Region>>,
    faqs: Option<Arc<dyn Region>>,
    conversations: Option<ConversationPanel>,
    report: Option<ReportPanel>,
}

impl Dashboard {
    pub fn new(loader: PanelLoader, routes: RoutesConfig) -> Self {
        Self {
            loader,
            routes,
            clients: None,
            faqs: None,
            conversations: None,
            report: None,
        }
    }

    pub fn with_clients(mut self, region: Arc<dyn Region>) -> Self {
        self.clients = Some(region);
        self
    }

    pub fn with_faqs(mut self, region: Arc<dyn Region>) -> Self {
        self.faqs = Some(region);
        self
    }

    /// The conversation panel is only loaded when `wa_id` is a non-empty WhatsApp id.
    pub fn with_conversations(mut self, region: Arc<dyn Region>, wa_id: Option<String>) -> Self {
        self.conversations = Some(ConversationPanel { region, wa_id });
        self
    }

    pub fn with_report(mut self, region: Arc<dyn Region>, chart: Arc<dyn ChartSink>) -> Self {
        self.report = Some(ReportPanel { region, chart });
        self
    }

    pub fn loader(&self) -> &PanelLoader {
        &self.loader
    }

    /// Loads every present panel concurrently. Panels share nothing, so one failing never
    /// affects another.
    pub async fn load_all(&self) -> DashboardSummary {
        let (clients, faqs, conversations, report) = futures::join!(
            self.load_clients(),
            self.load_faqs(),
            self.load_conversations(),
            self.load_report()
        );
        let summary = DashboardSummary {
            clients,
            faqs,
            conversations,
            report,
        };
        LOGGER.debug(format!("Dashboard panels loaded: {summary:?}"));
        summary
    }

    pub async fn load_clients(&self) -> PanelOutcome {
        let Some(region) = &self.clients else {
            return PanelOutcome::Skipped;
        };
        let result = self
            .loader
            .load(region.as_ref(), &self.routes.clients, |data: ClientsResponse| {
                Ok(render_clients(&data))
            })
            .await;
        PanelOutcome::from(&result)
    }

    pub async fn load_faqs(&self) -> PanelOutcome {
        let Some(region) = &self.faqs else {
            return PanelOutcome::Skipped;
        };
        let result = self
            .loader
            .load(region.as_ref(), &self.routes.faqs, |data: FaqsResponse| {
                Ok(render_faqs(&data))
            })
            .await;
        PanelOutcome::from(&result)
    }

    pub async fn load_conversations(&self) -> PanelOutcome {
        let Some(panel) = &self.conversations else {
            return PanelOutcome::Skipped;
        };
        let Some(wa_id) = panel.wa_id.as_deref().filter(|id| !id.trim().is_empty()) else {
            LOGGER.debug("No WhatsApp id on the page; conversation panel left as is");
            return PanelOutcome::Skipped;
        };
        let path = self.routes.chat_history_path(wa_id);
        let result = self
            .loader
            .load(panel.region.as_ref(), &path, |data: ChatHistoryResponse| {
                Ok(render_conversations(&data))
            })
            .await;
        PanelOutcome::from(&result)
    }

    /// The report region only hosts the loading indicator; the series goes to the chart.
    pub async fn load_report(&self) -> PanelOutcome {
        let Some(panel) = &self.report else {
            return PanelOutcome::Skipped;
        };
        let chart = &panel.chart;
        let result = self
            .loader
            .load(panel.region.as_ref(), &self.routes.monthly_report, |data: MonthlyReport| {
                match report_chart(&data)? {
                    Some(bar_chart) => {
                        chart.draw_bar_chart(&bar_chart);
                        Ok(String::new())
                    }
                    None => Ok(empty_message(NO_REPORT_MESSAGE)),
                }
            })
            .await;
        PanelOutcome::from(&result)
    }

    /// Liveness check against the API; returns the server's message.
    pub async fn ping(&self) -> PanelResult<String> {
        let response: PingResponse = self.loader.fetch_json(&self.routes.ping).await?;
        Ok(response.message.unwrap_or_default())
    }
}
