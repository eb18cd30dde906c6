use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message received from SQS, detached from the SDK types.
///
/// Every field is optional because the service is free to omit any of them.
/// Field names on the wire match the SQS API names so an exported file reads
/// the same as the service's own JSON representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "MessageId", skip_serializing_if = "Option::is_none", default)]
    pub message_id: Option<String>,

    #[serde(rename = "ReceiptHandle", skip_serializing_if = "Option::is_none", default)]
    pub receipt_handle: Option<String>,

    #[serde(rename = "MD5OfBody", skip_serializing_if = "Option::is_none", default)]
    pub md5_of_body: Option<String>,

    #[serde(rename = "Body", skip_serializing_if = "Option::is_none", default)]
    pub body: Option<String>,

    /// System attributes such as `SentTimestamp`, keyed by attribute name.
    #[serde(rename = "Attributes", skip_serializing_if = "Option::is_none", default)]
    pub attributes: Option<BTreeMap<String, String>>,

    #[serde(
        rename = "MD5OfMessageAttributes",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub md5_of_message_attributes: Option<String>,

    /// User-defined attributes attached by the sender.
    #[serde(rename = "MessageAttributes", skip_serializing_if = "Option::is_none", default)]
    pub message_attributes: Option<BTreeMap<String, MessageAttribute>>,
}

/// A single user-defined message attribute.
///
/// Binary payloads are kept base64-encoded so the whole record stays
/// representable as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttribute {
    #[serde(rename = "DataType")]
    pub data_type: String,

    #[serde(rename = "StringValue", skip_serializing_if = "Option::is_none", default)]
    pub string_value: Option<String>,

    #[serde(rename = "BinaryValue", skip_serializing_if = "Option::is_none", default)]
    pub binary_value: Option<String>,

    #[serde(
        rename = "StringListValues",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub string_list_values: Vec<String>,

    #[serde(
        rename = "BinaryListValues",
        skip_serializing_if = "Vec::is_empty",
        default
    )]
    pub binary_list_values: Vec<String>,
}

impl From<aws_sdk_sqs::types::Message> for Message {
    fn from(msg: aws_sdk_sqs::types::Message) -> Self {
        let attributes = msg.attributes().map(|attrs| {
            attrs
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                .collect()
        });

        let message_attributes = msg.message_attributes().map(convert_message_attributes);

        Message {
            message_id: msg.message_id().map(str::to_string),
            receipt_handle: msg.receipt_handle().map(str::to_string),
            md5_of_body: msg.md5_of_body().map(str::to_string),
            body: msg.body().map(str::to_string),
            attributes,
            md5_of_message_attributes: msg.md5_of_message_attributes().map(str::to_string),
            message_attributes,
        }
    }
}

fn convert_message_attributes(
    attrs: &HashMap<String, aws_sdk_sqs::types::MessageAttributeValue>,
) -> BTreeMap<String, MessageAttribute> {
    attrs
        .iter()
        .map(|(name, value)| {
            let attribute = MessageAttribute {
                data_type: value.data_type().to_string(),
                string_value: value.string_value().map(str::to_string),
                binary_value: value.binary_value().map(|blob| STANDARD.encode(blob.as_ref())),
                string_list_values: value.string_list_values().to_vec(),
                binary_list_values: value
                    .binary_list_values()
                    .iter()
                    .map(|blob| STANDARD.encode(blob.as_ref()))
                    .collect(),
            };
            (name.clone(), attribute)
        })
        .collect()
}

/// The named fields of a [`Message`] that can be selected for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
    MessageId,
    ReceiptHandle,
    Md5OfBody,
    Body,
    Attributes,
    Md5OfMessageAttributes,
    MessageAttributes,
}

static FIELDS_BY_NAME: LazyLock<HashMap<&'static str, MessageField>> = LazyLock::new(|| {
    MessageField::ALL
        .iter()
        .map(|field| (field.name(), *field))
        .collect()
});

impl MessageField {
    /// All fields, in the order they appear on a message.
    pub const ALL: [MessageField; 7] = [
        MessageField::MessageId,
        MessageField::ReceiptHandle,
        MessageField::Md5OfBody,
        MessageField::Body,
        MessageField::Attributes,
        MessageField::Md5OfMessageAttributes,
        MessageField::MessageAttributes,
    ];

    /// The externally visible name, identical to the serialized key.
    pub fn name(self) -> &'static str {
        match self {
            MessageField::MessageId => "MessageId",
            MessageField::ReceiptHandle => "ReceiptHandle",
            MessageField::Md5OfBody => "MD5OfBody",
            MessageField::Body => "Body",
            MessageField::Attributes => "Attributes",
            MessageField::Md5OfMessageAttributes => "MD5OfMessageAttributes",
            MessageField::MessageAttributes => "MessageAttributes",
        }
    }

    /// Looks up a field by its exact, case-sensitive name.
    pub fn from_name(name: &str) -> Option<MessageField> {
        FIELDS_BY_NAME.get(name).copied()
    }

    /// Reads this field from `message` as a JSON value; absent fields are `Null`.
    pub fn value(self, message: &Message) -> Value {
        match self {
            MessageField::MessageId => optional_string(&message.message_id),
            MessageField::ReceiptHandle => optional_string(&message.receipt_handle),
            MessageField::Md5OfBody => optional_string(&message.md5_of_body),
            MessageField::Body => optional_string(&message.body),
            MessageField::Attributes => serde_json::to_value(&message.attributes)
                .unwrap_or(Value::Null),
            MessageField::Md5OfMessageAttributes => {
                optional_string(&message.md5_of_message_attributes)
            }
            MessageField::MessageAttributes => serde_json::to_value(&message.message_attributes)
                .unwrap_or(Value::Null),
        }
    }
}

fn optional_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}
