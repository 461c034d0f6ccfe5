//! The described-type definitions of the AMQP 1.0 core specification, laid
//! out as data: descriptor, ordered field names, and the mandatory leading
//! field count. Only list-bodied types appear here — the map- and
//! value-bodied message sections (annotations, application-properties,
//! footer, data, amqp-sequence, amqp-value) carry no ordinal fields and
//! decode through the described passthrough instead.

use std::sync::Arc;

use crate::{CompositeDef, Registry};

// Part 2.7: transport performatives
pub const OPEN: CompositeDef = CompositeDef::new(
    "amqp:open:list",
    0x10,
    &[
        "container-id",
        "hostname",
        "max-frame-size",
        "channel-max",
        "idle-time-out",
        "outgoing-locales",
        "incoming-locales",
        "offered-capabilities",
        "desired-capabilities",
        "properties",
    ],
    1,
);

pub const BEGIN: CompositeDef = CompositeDef::new(
    "amqp:begin:list",
    0x11,
    &[
        "remote-channel",
        "next-outgoing-id",
        "incoming-window",
        "outgoing-window",
        "handle-max",
        "offered-capabilities",
        "desired-capabilities",
        "properties",
    ],
    4,
);

pub const ATTACH: CompositeDef = CompositeDef::new(
    "amqp:attach:list",
    0x12,
    &[
        "name",
        "handle",
        "role",
        "snd-settle-mode",
        "rcv-settle-mode",
        "source",
        "target",
        "unsettled",
        "incomplete-unsettled",
        "initial-delivery-count",
        "max-message-size",
        "offered-capabilities",
        "desired-capabilities",
        "properties",
    ],
    3,
);

pub const FLOW: CompositeDef = CompositeDef::new(
    "amqp:flow:list",
    0x13,
    &[
        "next-incoming-id",
        "incoming-window",
        "next-outgoing-id",
        "outgoing-window",
        "handle",
        "delivery-count",
        "link-credit",
        "available",
        "drain",
        "echo",
        "properties",
    ],
    4,
);

pub const TRANSFER: CompositeDef = CompositeDef::new(
    "amqp:transfer:list",
    0x14,
    &[
        "handle",
        "delivery-id",
        "delivery-tag",
        "message-format",
        "settled",
        "more",
        "rcv-settle-mode",
        "state",
        "resume",
        "aborted",
        "batchable",
    ],
    1,
);

pub const DISPOSITION: CompositeDef = CompositeDef::new(
    "amqp:disposition:list",
    0x15,
    &["role", "first", "last", "settled", "state", "batchable"],
    2,
);

pub const DETACH: CompositeDef =
    CompositeDef::new("amqp:detach:list", 0x16, &["handle", "closed", "error"], 1);

pub const END: CompositeDef = CompositeDef::new("amqp:end:list", 0x17, &["error"], 0);

pub const CLOSE: CompositeDef = CompositeDef::new("amqp:close:list", 0x18, &["error"], 0);

// Part 2.8.14
pub const ERROR: CompositeDef = CompositeDef::new(
    "amqp:error:list",
    0x1d,
    &["condition", "description", "info"],
    1,
);

// Part 3.4: delivery states and outcomes
pub const RECEIVED: CompositeDef = CompositeDef::new(
    "amqp:received:list",
    0x23,
    &["section-number", "section-offset"],
    2,
);

pub const ACCEPTED: CompositeDef = CompositeDef::new("amqp:accepted:list", 0x24, &[], 0);

pub const REJECTED: CompositeDef =
    CompositeDef::new("amqp:rejected:list", 0x25, &["error"], 0);

pub const RELEASED: CompositeDef = CompositeDef::new("amqp:released:list", 0x26, &[], 0);

pub const MODIFIED: CompositeDef = CompositeDef::new(
    "amqp:modified:list",
    0x27,
    &["delivery-failed", "undeliverable-here", "message-annotations"],
    0,
);

// Part 3.5: terminus definitions
pub const SOURCE: CompositeDef = CompositeDef::new(
    "amqp:source:list",
    0x28,
    &[
        "address",
        "durable",
        "expiry-policy",
        "timeout",
        "dynamic",
        "dynamic-node-properties",
        "distribution-mode",
        "filter",
        "default-outcome",
        "outcomes",
        "capabilities",
    ],
    0,
);

pub const TARGET: CompositeDef = CompositeDef::new(
    "amqp:target:list",
    0x29,
    &[
        "address",
        "durable",
        "expiry-policy",
        "timeout",
        "dynamic",
        "dynamic-node-properties",
        "capabilities",
    ],
    0,
);

// Part 3.2: the list-bodied message sections
pub const HEADER: CompositeDef = CompositeDef::new(
    "amqp:header:list",
    0x70,
    &["durable", "priority", "ttl", "first-acquirer", "delivery-count"],
    0,
);

pub const PROPERTIES: CompositeDef = CompositeDef::new(
    "amqp:properties:list",
    0x73,
    &[
        "message-id",
        "user-id",
        "to",
        "subject",
        "reply-to",
        "correlation-id",
        "content-type",
        "content-encoding",
        "absolute-expiry-time",
        "creation-time",
        "group-id",
        "group-sequence",
        "reply-to-group-id",
    ],
    0,
);

// Part 4.5: transactions
pub const COORDINATOR: CompositeDef =
    CompositeDef::new("amqp:coordinator:list", 0x30, &["capabilities"], 0);

pub const DECLARE: CompositeDef =
    CompositeDef::new("amqp:declare:list", 0x31, &["global-id"], 0);

pub const DISCHARGE: CompositeDef =
    CompositeDef::new("amqp:discharge:list", 0x32, &["txn-id", "fail"], 1);

pub const DECLARED: CompositeDef =
    CompositeDef::new("amqp:declared:list", 0x33, &["txn-id"], 1);

pub const TRANSACTIONAL_STATE: CompositeDef = CompositeDef::new(
    "amqp:transactional-state:list",
    0x34,
    &["txn-id", "outcome"],
    1,
);

// Part 5.3: SASL frame bodies
pub const SASL_MECHANISMS: CompositeDef = CompositeDef::new(
    "amqp:sasl-mechanisms:list",
    0x40,
    &["sasl-server-mechanisms"],
    1,
);

pub const SASL_INIT: CompositeDef = CompositeDef::new(
    "amqp:sasl-init:list",
    0x41,
    &["mechanism", "initial-response", "hostname"],
    1,
);

pub const SASL_CHALLENGE: CompositeDef =
    CompositeDef::new("amqp:sasl-challenge:list", 0x42, &["challenge"], 1);

pub const SASL_RESPONSE: CompositeDef =
    CompositeDef::new("amqp:sasl-response:list", 0x43, &["response"], 1);

pub const SASL_OUTCOME: CompositeDef = CompositeDef::new(
    "amqp:sasl-outcome:list",
    0x44,
    &["code", "additional-data"],
    1,
);

/// The connection/session/link performatives, the error condition, delivery
/// states, and terminus definitions.
pub fn register_transport_types(reg: &mut Registry) {
    for def in [
        OPEN,
        BEGIN,
        ATTACH,
        FLOW,
        TRANSFER,
        DISPOSITION,
        DETACH,
        END,
        CLOSE,
        ERROR,
        RECEIVED,
        ACCEPTED,
        REJECTED,
        RELEASED,
        MODIFIED,
        SOURCE,
        TARGET,
    ] {
        reg.register(Arc::new(def));
    }
}

/// The list-bodied message sections.
pub fn register_messaging_types(reg: &mut Registry) {
    for def in [HEADER, PROPERTIES] {
        reg.register(Arc::new(def));
    }
}

/// The transaction coordination types.
pub fn register_transaction_types(reg: &mut Registry) {
    for def in [COORDINATOR, DECLARE, DISCHARGE, DECLARED, TRANSACTIONAL_STATE] {
        reg.register(Arc::new(def));
    }
}

/// The SASL negotiation frame bodies. Kept out of [`Registry::standard`]
/// since plain AMQP connections never see them.
pub fn register_security_types(reg: &mut Registry) {
    for def in [
        SASL_MECHANISMS,
        SASL_INIT,
        SASL_CHALLENGE,
        SASL_RESPONSE,
        SASL_OUTCOME,
    ] {
        reg.register(Arc::new(def));
    }
}
