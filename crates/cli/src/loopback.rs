//! Loopback transport — composes a plain-text message and "delivers" it
//! without opening a connection. Used by `mailticks send` for dry runs.

use mailticks_core::{
    Address, CompletionCallback, SMTP_KIND, SendOutcome, SmtpSettings, Transport, TransportError,
    TransportState,
};

pub struct LoopbackTransport {
    smtp: SmtpSettings,
    from: String,
    to: Vec<Address>,
    cc: Vec<Address>,
    subject: String,
    body: String,
    /// Result reported for every send
    deliver: bool,
    header: String,
    mime_body: String,
    sequence: u64,
}

impl LoopbackTransport {
    pub fn new(smtp: SmtpSettings, from: impl Into<String>) -> Self {
        Self {
            smtp,
            from: from.into(),
            to: Vec::new(),
            cc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            deliver: true,
            header: String::new(),
            mime_body: String::new(),
            sequence: 0,
        }
    }

    pub fn to(mut self, address: Address) -> Self {
        self.to.push(address);
        self
    }

    pub fn cc(mut self, address: Address) -> Self {
        self.cc.push(address);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Report every send as failed.
    pub fn failing(mut self) -> Self {
        self.deliver = false;
        self
    }

    fn compose(&mut self) {
        let join = |list: &[Address]| {
            list.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut header = format!("From: {}\r\nTo: {}\r\n", self.from, join(&self.to));
        if !self.cc.is_empty() {
            header.push_str(&format!("Cc: {}\r\n", join(&self.cc)));
        }
        header.push_str(&format!(
            "Subject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=utf-8\r\n",
            self.subject
        ));

        self.header = header;
        self.mime_body = self.body.replace('\n', "\r\n");
    }
}

impl TransportState for LoopbackTransport {
    fn kind(&self) -> &str {
        SMTP_KIND
    }

    fn host(&self) -> &str {
        &self.smtp.host
    }

    fn smtp_settings(&self) -> Option<&SmtpSettings> {
        Some(&self.smtp)
    }

    fn mime_header(&self) -> &str {
        &self.header
    }

    fn mime_body(&self) -> &str {
        &self.mime_body
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, on_complete: &mut CompletionCallback<'_>) -> Result<bool, TransportError> {
        if self.to.is_empty() {
            return Err(TransportError::NotConfigured(
                "at least one recipient is required".into(),
            ));
        }

        self.compose();
        self.sequence += 1;

        let mut extra = serde_json::Map::new();
        extra.insert(
            "smtp_transaction_id".into(),
            if self.deliver {
                serde_json::Value::String(format!("loopback-{}", self.sequence))
            } else {
                serde_json::Value::Bool(false)
            },
        );

        let outcome = SendOutcome {
            success: self.deliver,
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: Vec::new(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            from: self.from.clone(),
            extra,
        };
        on_complete(&outcome, &*self);

        Ok(self.deliver)
    }
}
