use std::fmt::Write;

use crate::models::Expense;
use crate::types::{format_currency, ExpenseId};

pub const UNAUTHORIZED: &str = "You are not authorized to use this bot.";

pub const START: &str = "🤖 Selamat datang di SmartExpenseAI!\n\n\
Fitur yang tersedia:\n\
• Kirim pesan biasa untuk mencatat pengeluaran\n\
• /lihat - Lihat 10 pengeluaran terakhir\n\
• /bulan - Lihat rekap pengeluaran 30 hari terakhir\n\
• /minggu - Lihat rekap pengeluaran 7 hari terakhir\n\
• /hapus - Hapus pengeluaran (contoh: /hapus 5)\n\
• /update - Update pengeluaran (contoh: /update 5 buku 50000 Pendidikan)\n\
• /bantuan - Tampilkan bantuan";

pub const HELP: &str = "🤖 Bantuan SmartExpenseAI:\n\n\
Cara mencatat pengeluaran:\n\
• Kirim pesan seperti: \"makan nasi padang 25000\" atau \"beli buku 50k\"\n\n\
Perintah yang tersedia:\n\
• /lihat - Lihat 10 pengeluaran terakhir kamu\n\
• /bulan - Lihat rekap pengeluaran 30 hari terakhir per bulan\n\
• /minggu - Lihat rekap pengeluaran 7 hari terakhir per kategori\n\
• /hapus ID - Hapus pengeluaran, ganti ID dengan nomor pengeluaran\n\
• /update ID deskripsi jumlah kategori - Update pengeluaran\n\
• /bantuan - Tampilkan pesan bantuan ini\n\n\
Perintah alami yang bisa kamu gunakan:\n\
• \"lihat pengeluaranku\" - Lihat 10 pengeluaran terakhir kamu\n\
• \"rekap bulan ini\" - Lihat rekap pengeluaran 30 hari terakhir\n\
• \"rekap minggu ini\" - Lihat rekap pengeluaran 7 hari terakhir\n\
• \"hapus pengeluaran 5\" - Hapus pengeluaran dengan ID tertentu\n\
• \"bantuan\" - Tampilkan pesan bantuan ini";

/// Sent when the extraction service could not be reached or answered nonsense.
pub const GUIDANCE: &str = "🤖 Halo! Saya SmartExpenseAI, asisten yang membantu kamu mencatat pengeluaran.\n\n\
Kamu bisa kirim pesan seperti:\n\
• \"makan nasi padang 25000\"\n\
• \"beli buku 50k\"\n\n\
Untuk fitur lainnya, gunakan perintah:\n\
• /lihat - Lihat pengeluaran terakhir\n\
• /bulan - Rekap bulan ini\n\
• /hapus - Hapus pengeluaran";

/// Sent when the extraction service found no amount in the text.
pub const NO_EXPENSE: &str = "🤖 Tidak bisa mengenali pengeluaran dari pesanmu.\n\n\
Contoh format yang benar:\n\
• \"makan nasi padang 25000\"\n\
• \"beli buku 50k\"\n\n\
Untuk fitur lainnya, gunakan perintah:\n\
• /lihat - Lihat pengeluaran terakhir\n\
• /bulan - Rekap bulan ini\n\
• /hapus - Hapus pengeluaran";

pub const SAVE_FAILED: &str = "Gagal menyimpan pengeluaran. Silakan coba lagi.";
pub const LOAD_FAILED: &str = "Gagal mengambil data pengeluaran. Silakan coba lagi.";
pub const NO_EXPENSES_YET: &str = "Kamu belum memiliki pengeluaran yang tercatat.";

pub const LIST_LIMIT: usize = 10;

pub fn saved(id: ExpenseId, category: &str, amount: &str, description: &str) -> String {
    format!("✅ Disimpan:\nID: {id}\nKategori: {category}\nJumlah: Rp{amount}\nDeskripsi: {description}")
}

pub fn deleted(id: ExpenseId) -> String {
    format!("✅ Pengeluaran dengan ID {id} berhasil dihapus.")
}

pub fn delete_failed(id: ExpenseId) -> String {
    format!("Gagal menghapus pengeluaran dengan ID {id}.")
}

pub fn not_found(id: ExpenseId) -> String {
    format!("Pengeluaran dengan ID {id} tidak ditemukan.")
}

pub fn update_failed(id: ExpenseId) -> String {
    format!("Gagal mengupdate pengeluaran dengan ID {id}.")
}

pub fn updated(expense: &Expense) -> String {
    format!(
        "✅ Pengeluaran dengan ID {} berhasil diupdate:\n\nDeskripsi: {}\nJumlah: Rp{}\nKategori: {}",
        expense.id,
        expense.description,
        format_currency(expense.amount),
        expense.category
    )
}

/// Renders at most [`LIST_LIMIT`] expenses, in the order given.
pub fn expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return NO_EXPENSES_YET.to_string()
    }

    let mut output = String::from("📋 10 Pengeluaran Terakhir Kamu:\n\n");

    for expense in expenses.iter().take(LIST_LIMIT) {
        let _ = write!(
            output,
            "ID: {}\n   {}\n   Rp{}\n   Kategori: {}\n   Tanggal: {}\n\n",
            expense.id,
            expense.description,
            format_currency(expense.amount),
            expense.category,
            expense.date.format("%-d %b %Y")
        );
    }

    output.push_str("Kamu bisa hapus dengan perintah: /hapus ID\nContoh: /hapus 5\n\n");
    output.push_str("Kamu bisa update dengan perintah: /update ID deskripsi jumlah kategori\nContoh: /update 5 buku 50000 Pendidikan");

    output
}
