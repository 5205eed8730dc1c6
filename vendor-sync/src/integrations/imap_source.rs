use crate::integrations::mail_source::{MailSource, MailSourceError, MessageAdapter, Rfc822Message};
use chrono::{DateTime, Duration, Utc};
use imap::ClientBuilder;
use shared_types::MailMessage;

/// UIDs fetched per `UID FETCH` round trip.
const FETCH_BATCH_SIZE: usize = 50;

/// Reads recent messages from one IMAP mailbox with password login.
pub struct ImapMailSource {
    session: imap::Session<imap::Connection>,
    name: String,
    mailbox: String,
}

impl ImapMailSource {
    pub fn connect_with_password(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        mailbox: &str,
    ) -> Result<Self, MailSourceError> {
        let client = ClientBuilder::new(host, port)
            .connect()
            .map_err(|e| MailSourceError::Connect(format!("{}:{}", host, port), e.to_string()))?;

        let session = client
            .login(username, password)
            .map_err(|(e, _)| MailSourceError::Auth(username.to_string(), e.to_string()))?;

        tracing::info!("Connected to IMAP server {}:{} as {}", host, port, username);

        Ok(Self {
            session,
            name: format!("imap://{}@{}/{}", username, host, mailbox),
            mailbox: mailbox.to_string(),
        })
    }

    /// Server side `SEARCH SINCE`; on failure falls back to `SEARCH ALL` and
    /// leaves the time window to the caller.
    fn search_uids(&mut self, cutoff: DateTime<Utc>) -> Result<Vec<u32>, MailSourceError> {
        // SINCE has day granularity and is evaluated in the server's timezone
        let since = cutoff - Duration::days(1);
        let query = format!("SINCE {}", since.format("%d-%b-%Y"));

        tracing::info!("IMAP SEARCH query: {}", query);

        let uids = match self.session.uid_search(&query) {
            Ok(uids) => uids,
            Err(e) => {
                tracing::warn!(
                    "IMAP SEARCH SINCE failed on {} ({}), falling back to SEARCH ALL",
                    self.mailbox,
                    e
                );
                self.session
                    .uid_search("ALL")
                    .map_err(|e| MailSourceError::Search(e.to_string()))?
            }
        };

        let mut uids: Vec<u32> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_batch(&mut self, uids: &[u32]) -> Result<Vec<MailMessage>, MailSourceError> {
        let uid_set = uids
            .iter()
            .map(|uid| uid.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let fetches = self
            .session
            .uid_fetch(&uid_set, "(UID RFC822 INTERNALDATE)")
            .map_err(|e| MailSourceError::Fetch(e.to_string()))?;

        let mut messages = Vec::new();
        for fetch in fetches.iter() {
            let uid = fetch.uid.map(|u| u.to_string()).unwrap_or_default();

            let Some(body) = fetch.body() else {
                tracing::warn!("Email UID {} has no body, skipping", uid);
                continue;
            };

            let internal_date = fetch.internal_date().map(|dt| dt.with_timezone(&Utc));

            match Rfc822Message::parse(uid.clone(), body) {
                Ok(parsed) => {
                    messages.push(parsed.with_preferred_time(internal_date).to_mail_message())
                }
                Err(e) => tracing::warn!("Skipping email UID {}: {}", uid, e),
            }
        }

        Ok(messages)
    }
}

impl MailSource for ImapMailSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_since(&mut self, cutoff: DateTime<Utc>) -> Result<Vec<MailMessage>, MailSourceError> {
        self.session
            .select(&self.mailbox)
            .map_err(|e| MailSourceError::Mailbox(self.mailbox.clone(), e.to_string()))?;

        let uids = self.search_uids(cutoff)?;
        tracing::info!("Found {} candidate emails in {}", uids.len(), self.mailbox);

        let mut messages = Vec::with_capacity(uids.len());
        for batch in uids.chunks(FETCH_BATCH_SIZE) {
            messages.extend(self.fetch_batch(batch)?);
        }

        Ok(messages)
    }
}

impl Drop for ImapMailSource {
    fn drop(&mut self) {
        if let Err(e) = self.session.logout() {
            tracing::debug!("IMAP logout failed: {}", e);
        }
    }
}
