use std::collections::HashSet;
use std::fmt;

use crate::error::{CommishError, Result};

/// How a canonical field is coerced during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Numeric,
    Integer,
    Boolean,
}

/// Canonical column shared across all carriers' reports.
///
/// Every carrier mapping targets one of these; the variant knows its SQL
/// column name and coercion kind, so adding a field here is the only step
/// needed to extend the unified schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    GeneratedFrom,
    PaymentDate,
    PayeeName,
    PayeeNpn,
    PayeeType,
    StatementDate,
    Product,
    PolicyNumber,
    MemberId,
    InsuredName,
    EffectiveDate,
    PayoutType,
    WritingAgent,
    WritingAgentNumber,
    TransactionType,
    NewToMedicare,
    CarrierTransactionType,
    MemberCount,
    Amount,
    AssignedAgentName,
    CommissionMonth,
    CommissionType,
    State,
    Lives,
    BlockReason,
}

impl CanonicalField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::GeneratedFrom => "generated_from",
            Self::PaymentDate => "payment_date",
            Self::PayeeName => "payee_name",
            Self::PayeeNpn => "payee_npn",
            Self::PayeeType => "payee_type",
            Self::StatementDate => "statement_date",
            Self::Product => "product",
            Self::PolicyNumber => "policy_number",
            Self::MemberId => "member_id",
            Self::InsuredName => "insured_name",
            Self::EffectiveDate => "effective_date",
            Self::PayoutType => "payout_type",
            Self::WritingAgent => "writing_agent",
            Self::WritingAgentNumber => "writing_agent_number",
            Self::TransactionType => "transaction_type",
            Self::NewToMedicare => "new_to_medicare",
            Self::CarrierTransactionType => "carrier_transaction_type",
            Self::MemberCount => "member_count",
            Self::Amount => "amount",
            Self::AssignedAgentName => "assigned_agent_name",
            Self::CommissionMonth => "commission_month",
            Self::CommissionType => "commission_type",
            Self::State => "state",
            Self::Lives => "lives",
            Self::BlockReason => "block_reason",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::PaymentDate | Self::StatementDate | Self::EffectiveDate => FieldKind::Date,
            Self::Amount => FieldKind::Numeric,
            Self::MemberCount | Self::Lives => FieldKind::Integer,
            Self::NewToMedicare => FieldKind::Boolean,
            _ => FieldKind::Text,
        }
    }
}

/// A supported carrier, carrying its header mapping as associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carrier {
    Molina,
    Ambetter,
    Aetna,
    Oscar,
}

type Mapping = &'static [(&'static str, CanonicalField)];

const MOLINA_MAPPING: Mapping = &[
    ("Generated From", CanonicalField::GeneratedFrom),
    ("Payment Date", CanonicalField::PaymentDate),
    ("PayeeName", CanonicalField::PayeeName),
    ("NPN", CanonicalField::PayeeNpn),
    ("Statement Date", CanonicalField::StatementDate),
    ("Product", CanonicalField::Product),
    ("Policy", CanonicalField::PolicyNumber),
    ("Insured", CanonicalField::InsuredName),
    ("Effective Date", CanonicalField::EffectiveDate),
    ("WritingAgent", CanonicalField::WritingAgent),
    ("Writing Agent Number", CanonicalField::WritingAgentNumber),
    ("Transaction Type", CanonicalField::TransactionType),
    ("NewToMedicare", CanonicalField::NewToMedicare),
    ("Carrier Transaction Type", CanonicalField::CarrierTransactionType),
    ("Member Count", CanonicalField::MemberCount),
    ("Amount", CanonicalField::Amount),
    ("Agente", CanonicalField::AssignedAgentName),
    ("Mes Pagado", CanonicalField::CommissionMonth),
];

const AMBETTER_MAPPING: Mapping = &[
    ("Generated From", CanonicalField::GeneratedFrom),
    ("Payment Date", CanonicalField::PaymentDate),
    ("PayeeName", CanonicalField::PayeeName),
    ("NPN", CanonicalField::PayeeNpn),
    ("Statement Date", CanonicalField::StatementDate),
    ("Product", CanonicalField::Product),
    ("Policy", CanonicalField::PolicyNumber),
    ("Insured", CanonicalField::InsuredName),
    ("Effective Date", CanonicalField::EffectiveDate),
    ("PayoutType", CanonicalField::PayoutType),
    ("Writing Agent", CanonicalField::WritingAgent),
    ("Writing Agent Number", CanonicalField::WritingAgentNumber),
    ("TransactionType", CanonicalField::TransactionType),
    ("NewToMedicare", CanonicalField::NewToMedicare),
    ("Carrier Transaction Type", CanonicalField::CarrierTransactionType),
    ("Member Count", CanonicalField::MemberCount),
    ("Amount", CanonicalField::Amount),
    ("Unnamed: 18", CanonicalField::AssignedAgentName),
];

const AETNA_MAPPING: Mapping = &[
    ("Generated From", CanonicalField::GeneratedFrom),
    ("Payment Date", CanonicalField::PaymentDate),
    ("PayeeName", CanonicalField::PayeeName),
    ("Statement Date", CanonicalField::StatementDate),
    ("Product", CanonicalField::Product),
    ("Policy", CanonicalField::PolicyNumber),
    ("Insured", CanonicalField::InsuredName),
    ("Effective Date", CanonicalField::EffectiveDate),
    ("Payout Type", CanonicalField::PayoutType),
    ("WritingAgent", CanonicalField::WritingAgent),
    ("WritingAgentNumber", CanonicalField::WritingAgentNumber),
    ("Transaction Type", CanonicalField::TransactionType),
    ("NewToMedicare", CanonicalField::NewToMedicare),
    ("CarrierTransactionType", CanonicalField::CarrierTransactionType),
    ("Member Count", CanonicalField::MemberCount),
    ("Amount", CanonicalField::Amount),
];

const OSCAR_MAPPING: Mapping = &[
    ("Commission type", CanonicalField::CommissionType),
    ("Payee name", CanonicalField::PayeeName),
    ("Payee type", CanonicalField::PayeeType),
    ("Payee NPN", CanonicalField::PayeeNpn),
    ("Member ID", CanonicalField::MemberId),
    ("Subscriber name", CanonicalField::InsuredName),
    ("State", CanonicalField::State),
    ("Lives", CanonicalField::Lives),
    ("Effective Date", CanonicalField::EffectiveDate),
    ("Commission", CanonicalField::Amount),
    ("Commission month", CanonicalField::CommissionMonth),
    ("Block Reason", CanonicalField::BlockReason),
    ("Unnamed: 12", CanonicalField::AssignedAgentName),
];

impl Carrier {
    /// Detection and tie-breaking follow this order: the first carrier to
    /// reach the maximum header intersection wins.
    pub const ALL: &'static [Carrier] =
        &[Carrier::Molina, Carrier::Ambetter, Carrier::Aetna, Carrier::Oscar];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Molina => "MOLINA",
            Self::Ambetter => "AMBETTER",
            Self::Aetna => "AETNA",
            Self::Oscar => "OSCAR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Molina => "Molina Healthcare",
            Self::Ambetter => "Ambetter",
            Self::Aetna => "Aetna",
            Self::Oscar => "Oscar Health",
        }
    }

    pub fn mapping(&self) -> Mapping {
        match self {
            Self::Molina => MOLINA_MAPPING,
            Self::Ambetter => AMBETTER_MAPPING,
            Self::Aetna => AETNA_MAPPING,
            Self::Oscar => OSCAR_MAPPING,
        }
    }

    pub fn from_code(code: &str) -> Result<Carrier> {
        let upper = code.trim().to_uppercase();
        Carrier::ALL
            .iter()
            .find(|c| c.code() == upper)
            .copied()
            .ok_or_else(|| {
                let available = Carrier::ALL
                    .iter()
                    .map(|c| c.code())
                    .collect::<Vec<_>>()
                    .join(", ");
                CommishError::UnsupportedCarrier(code.to_string(), available)
            })
    }

    /// Pick the carrier whose expected headers best overlap the input's.
    ///
    /// Accepts the best match only when the intersection covers at least half
    /// of that carrier's mapping; otherwise the file is treated as unknown.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<Carrier> {
        let present: HashSet<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();

        let mut best: Option<Carrier> = None;
        let mut max_matches = 0usize;
        for carrier in Carrier::ALL {
            let matches = carrier
                .mapping()
                .iter()
                .filter(|(raw, _)| present.contains(raw))
                .count();
            if matches > max_matches {
                max_matches = matches;
                best = Some(*carrier);
            }
        }

        match best {
            Some(c) if max_matches * 2 >= c.mapping().len() => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
