use super::*;

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) echo: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            echo: true,
        }
    }
}

impl TraceState {
    pub(crate) fn event_line(&mut self, line: String) {
        if self.enabled && self.events {
            self.line(line);
        }
    }

    pub(crate) fn timer_line(&mut self, line: String) {
        if self.enabled && self.timers {
            self.line(line);
        }
    }

    fn line(&mut self, line: String) {
        if self.echo {
            tracing::debug!(target: "cpu_wars_page::trace", "{line}");
        }
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn set_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "trace log limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_trace_records_nothing() {
        let mut trace = TraceState::default();
        trace.event_line("[event] click".into());
        assert!(trace.take().is_empty());
    }

    #[test]
    fn log_limit_drops_oldest_lines() -> Result<()> {
        let mut trace = TraceState {
            enabled: true,
            echo: false,
            ..TraceState::default()
        };
        trace.set_log_limit(2)?;
        trace.timer_line("a".into());
        trace.timer_line("b".into());
        trace.event_line("c".into());
        assert_eq!(trace.take(), vec!["b".to_string(), "c".to_string()]);
        Ok(())
    }

    #[test]
    fn category_toggles_filter_lines() {
        let mut trace = TraceState {
            enabled: true,
            timers: false,
            echo: false,
            ..TraceState::default()
        };
        trace.timer_line("[timer] run".into());
        trace.event_line("[event] done".into());
        assert_eq!(trace.take(), vec!["[event] done".to_string()]);
    }
}
