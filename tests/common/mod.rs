#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dashboard_bridge::panels::{BarChart, ChartSink, Region};
use dashboard_bridge::session::{Navigator, RenderedStatus, StatusDisplay};

pub struct Page {
    path: String,
    visits: Mutex<Vec<String>>,
}

impl Page {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: path.to_string(),
            visits: Mutex::new(Vec::new()),
        })
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for Page {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
pub struct StatusLine {
    shown: Mutex<Vec<RenderedStatus>>,
}

impl StatusLine {
    pub fn last(&self) -> Option<RenderedStatus> {
        self.shown.lock().unwrap().last().cloned()
    }
}

impl StatusDisplay for StatusLine {
    fn show(&self, status: &RenderedStatus) {
        self.shown.lock().unwrap().push(status.clone());
    }
}

#[derive(Default)]
pub struct Panel {
    html: Mutex<Vec<String>>,
}

impl Panel {
    pub fn current(&self) -> String {
        self.html.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn writes(&self) -> usize {
        self.html.lock().unwrap().len()
    }
}

impl Region for Panel {
    fn set_html(&self, markup: &str) {
        self.html.lock().unwrap().push(markup.to_string());
    }
}

#[derive(Default)]
pub struct Chart {
    drawn: Mutex<Vec<BarChart>>,
}

impl Chart {
    pub fn drawn(&self) -> Vec<BarChart> {
        self.drawn.lock().unwrap().clone()
    }
}

impl ChartSink for Chart {
    fn draw_bar_chart(&self, chart: &BarChart) {
        self.drawn.lock().unwrap().push(chart.clone());
    }
}
