// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Signer
//!
//! Signer roles and the widget placements sent to the provider for each of
//! them. Role labels differ between deployments ("HR"/"Manager" versus
//! "Role 1"/"Role 2"), so both labels and placements come from configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Signature,
    Email,
}

/// A field placement on a page of the uploaded PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// 1-based page number
    pub page: u32,
    pub x: u32,
    pub y: u32,
    #[serde(default = "default_widget_width")]
    pub w: u32,
    #[serde(default = "default_widget_height")]
    pub h: u32,
}

impl Widget {
    pub fn signature(page: u32, x: u32, y: u32) -> Self {
        Self {
            kind: WidgetKind::Signature,
            page,
            x,
            y,
            w: default_widget_width(),
            h: default_widget_height(),
        }
    }

    pub fn email(page: u32, x: u32, y: u32) -> Self {
        Self {
            kind: WidgetKind::Email,
            page,
            x,
            y,
            w: default_widget_width(),
            h: 20,
        }
    }
}

/// A signer entry as it appears in provider requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signer {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub widgets: Vec<Widget>,
}

/// Label and widget placements for one signing position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerLayout {
    pub label: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl SignerLayout {
    pub fn new(label: impl Into<String>, widgets: Vec<Widget>) -> Self {
        Self {
            label: label.into(),
            widgets,
        }
    }

    /// Signer carrying every configured widget.
    pub fn signer(&self, email: Option<String>) -> Signer {
        self.signer_with(email, |_| true)
    }

    /// Signer carrying only its signature widgets.
    pub fn signature_signer(&self, email: impl Into<String>) -> Signer {
        self.signer_with(Some(email.into()), |w| w.kind == WidgetKind::Signature)
    }

    /// Signer with no widgets, used when re-sending an already placed role.
    pub fn bare_signer(&self, email: impl Into<String>) -> Signer {
        self.signer_with(Some(email.into()), |_| false)
    }

    fn signer_with(&self, email: Option<String>, keep: impl Fn(&Widget) -> bool) -> Signer {
        Signer {
            role: self.label.clone(),
            email,
            widgets: self.widgets.iter().filter(|w| keep(w)).cloned().collect(),
        }
    }
}

/// Role-label presets matching the two historical endpoint generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolePreset {
    HrManager,
    Generic,
}

impl RolePreset {
    pub fn labels(self) -> [&'static str; 3] {
        match self {
            RolePreset::HrManager => ["HR", "Manager", "Role 3"],
            RolePreset::Generic => ["Role 1", "Role 2", "Role 3"],
        }
    }
}

impl FromStr for RolePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hr-manager" | "hr_manager" => Ok(RolePreset::HrManager),
            "generic" => Ok(RolePreset::Generic),
            other => Err(format!(
                "unknown role preset '{}', expected 'hr-manager' or 'generic'",
                other
            )),
        }
    }
}

/// The three signing positions, in signing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerLayouts {
    pub role1: SignerLayout,
    pub role2: SignerLayout,
    pub role3: SignerLayout,
}

impl SignerLayouts {
    /// Default placements labelled with the given preset.
    pub fn with_preset(preset: RolePreset) -> Self {
        let mut layouts = Self::default();
        layouts.apply_preset(preset);
        layouts
    }

    /// Relabel the roles, keeping the widget placements.
    pub fn apply_preset(&mut self, preset: RolePreset) {
        let [role1, role2, role3] = preset.labels();
        self.role1.label = role1.to_string();
        self.role2.label = role2.to_string();
        self.role3.label = role3.to_string();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignerLayout> {
        [&self.role1, &self.role2, &self.role3].into_iter()
    }
}

impl Default for SignerLayouts {
    fn default() -> Self {
        let [role1, role2, role3] = RolePreset::HrManager.labels();
        Self {
            role1: SignerLayout::new(
                role1,
                vec![Widget::signature(1, 100, 200), Widget::email(1, 100, 260)],
            ),
            role2: SignerLayout::new(
                role2,
                vec![Widget::signature(2, 150, 250), Widget::email(2, 150, 310)],
            ),
            role3: SignerLayout::new(role3, vec![Widget::signature(3, 200, 300)]),
        }
    }
}

fn default_widget_width() -> u32 {
    150
}

fn default_widget_height() -> u32 {
    60
}
