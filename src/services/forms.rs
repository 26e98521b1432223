use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::error::BookingError;
use crate::services::booking_form::BookingFormController;
use crate::services::protocol::SubmissionProtocol;

const FORM_ID_LEN: usize = 12;

pub const DEFAULT_MAX_OPEN_FORMS: usize = 10_000;
pub const DEFAULT_FORM_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

pub type SharedForm = Arc<Mutex<BookingFormController>>;

/// Lock a form. Never hold the guard across an `.await`.
pub fn lock_form(form: &SharedForm) -> MutexGuard<'_, BookingFormController> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

struct FormEntry {
    form: SharedForm,
    last_touched: Instant,
}

/// Booking forms currently open in the service, keyed by form id.
///
/// Forms untouched for longer than the idle timeout are dropped when a new
/// form is opened, and no more than `max_forms` are open at once.
pub struct FormRegistry {
    protocol: SubmissionProtocol,
    endpoint: String,
    max_forms: usize,
    idle_timeout: Duration,
    forms: Mutex<HashMap<String, FormEntry>>,
}

impl FormRegistry {
    pub fn new(protocol: SubmissionProtocol, endpoint: impl Into<String>) -> Self {
        Self {
            protocol,
            endpoint: endpoint.into(),
            max_forms: DEFAULT_MAX_OPEN_FORMS,
            idle_timeout: DEFAULT_FORM_IDLE_TIMEOUT,
            forms: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_limits(mut self, max_forms: usize, idle_timeout: Duration) -> Self {
        self.max_forms = max_forms;
        self.idle_timeout = idle_timeout;
        self
    }

    fn forms(&self) -> MutexGuard<'_, HashMap<String, FormEntry>> {
        self.forms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune(&self, forms: &mut HashMap<String, FormEntry>) {
        let before = forms.len();
        let idle_timeout = self.idle_timeout;
        forms.retain(|_, entry| entry.last_touched.elapsed() < idle_timeout);

        let dropped = before - forms.len();
        if dropped > 0 {
            info!("Dropped {} idle booking forms", dropped);
        }
    }

    /// Drop forms that have been idle past the timeout.
    pub fn prune_idle(&self) {
        let mut forms = self.forms();
        self.prune(&mut forms);
    }

    /// Open an empty form and return its id.
    pub fn create(&self) -> Result<(String, SharedForm), BookingError> {
        let mut forms = self.forms();
        self.prune(&mut forms);
        if forms.len() >= self.max_forms {
            warn!("Refusing new booking form, {} already open", forms.len());
            return Err(BookingError::TooManyOpenForms);
        }

        let form_id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(FORM_ID_LEN)
            .map(char::from)
            .collect();
        let form = Arc::new(Mutex::new(BookingFormController::new(
            self.protocol,
            self.endpoint.clone(),
        )));

        forms.insert(
            form_id.clone(),
            FormEntry {
                form: Arc::clone(&form),
                last_touched: Instant::now(),
            },
        );
        info!("Opened booking form {}", form_id);
        Ok((form_id, form))
    }

    /// Look up a form and mark it as recently used.
    pub fn get(&self, form_id: &str) -> Result<SharedForm, BookingError> {
        match self.forms().get_mut(form_id) {
            Some(entry) => {
                entry.last_touched = Instant::now();
                Ok(Arc::clone(&entry.form))
            }
            None => Err(BookingError::FormNotFound(form_id.to_string())),
        }
    }

    /// Close a form. A submission still in flight completes on its own handle.
    pub fn remove(&self, form_id: &str) -> Result<(), BookingError> {
        match self.forms().remove(form_id) {
            Some(_) => {
                info!("Closed booking form {}", form_id);
                Ok(())
            }
            None => Err(BookingError::FormNotFound(form_id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.forms().len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms().is_empty()
    }
}
