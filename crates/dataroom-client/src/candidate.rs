//! Upload endpoints and how to talk to them.

use serde::Serialize;

/// How a file is sent to a candidate endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transport {
    /// `multipart/form-data` POST with the file in `field_name`. The
    /// endpoint answers with `{ "publicUrl": ... }`.
    Multipart {
        field_name: String,
        #[serde(skip)]
        headers: Vec<(String, String)>,
    },
    /// Raw-body POST to `<endpoint>/<bucket>/<generated name>`. Any 2xx
    /// means stored; the public URL is computed from `public_base_url`.
    DirectObject {
        bucket: String,
        public_base_url: String,
        #[serde(skip)]
        headers: Vec<(String, String)>,
    },
}

/// One endpoint in a fallback sequence.
#[derive(Clone, Debug, Serialize)]
pub struct UploadCandidate {
    pub name: String,
    pub endpoint_url: String,
    pub transport: Transport,
}

impl UploadCandidate {
    pub fn multipart(name: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint_url: endpoint_url.into(),
            transport: Transport::Multipart {
                field_name: dataroom_core::constants::FILE_FIELD.to_string(),
                headers: Vec::new(),
            },
        }
    }

    pub fn direct_object(
        name: impl Into<String>,
        endpoint_url: impl Into<String>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint_url: endpoint_url.into(),
            transport: Transport::DirectObject {
                bucket: bucket.into(),
                public_base_url: public_base_url.into(),
                headers: Vec::new(),
            },
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers_mut().push((name.into(), value.into()));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers_mut().extend(headers);
        self
    }

    /// Use a different multipart field name. No effect on direct object writes.
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        if let Transport::Multipart { field_name, .. } = &mut self.transport {
            *field_name = name.into();
        }
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        match &self.transport {
            Transport::Multipart { headers, .. } | Transport::DirectObject { headers, .. } => {
                headers
            }
        }
    }

    fn headers_mut(&mut self) -> &mut Vec<(String, String)> {
        match &mut self.transport {
            Transport::Multipart { headers, .. } | Transport::DirectObject { headers, .. } => {
                headers
            }
        }
    }
}
