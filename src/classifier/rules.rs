use crate::classifier::Intent;

/// Maps a set of lower-case keywords to an intent.
#[derive(Debug)]
pub struct Rule {
    pub intent: Intent,
    pub keywords: &'static [&'static str]
}

impl Rule {
    /// `lower_text` must already be lower-cased.
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|keyword| lower_text.contains(keyword))
    }
}

/// Checked top to bottom; overlapping keywords resolve to the earlier rule.
pub static RULES: &[Rule] = &[
    Rule {
        intent: Intent::List,
        keywords: &[
            "lihat pengeluaran", "tampilkan pengeluaran", "pengeluaranku", "daftar pengeluaran",
            "list pengeluaran", "show expenses", "my expenses", "lihat rekap", "lihat daftar",
            "tampilkan daftar", "daftar terakhir", "lihat terakhir", "pengeluaran terakhir",
            "lihat semua", "tampilkan semua", "lihat histori", "tampilkan histori",
        ]
    },
    Rule {
        intent: Intent::Monthly,
        keywords: &[
            "rekap bulan", "pengeluaran bulan", "ringkasan bulan", "summary bulan",
            "monthly recap", "month summary",
        ]
    },
    Rule {
        intent: Intent::Delete,
        keywords: &["hapus", "delete"]
    },
    Rule {
        intent: Intent::Help,
        keywords: &["bantuan", "help", "cara pakai", "perintah", "commands", "tutor", "cara guna"]
    },
    Rule {
        intent: Intent::Weekly,
        keywords: &["rekap minggu", "pengeluaran minggu", "ringkasan minggu", "summary minggu"]
    },
];
