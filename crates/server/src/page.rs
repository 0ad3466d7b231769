//! Control page served at `/`.

use axum::response::Html;
use engine::{AVAILABLE_CURRENCIES, DEFAULT_CATEGORIES};

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Daybook</title>
<style>
body { font-family: sans-serif; margin: 1.5rem; max-width: 60rem; }
fieldset { margin-bottom: 1rem; }
input, select { margin: 0.2rem; }
table { border-collapse: collapse; width: 100%; }
td, th { border: 1px solid #ccc; padding: 0.3rem; }
.credit { color: #006400; } .debit { color: #cc0000; }
</style>
</head>
<body>
<h1>Daybook</h1>
"#;

const SCRIPT: &str = r#"
<script>
const v = id => document.getElementById(id).value;
const radio = name => (document.querySelector(`input[name=${name}]:checked`) || {}).value;
function post(url, body, done) {
  fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) })
    .then(r => r.ok ? r.json() : r.json().then(e => Promise.reject(e.error)))
    .then(done).catch(err => alert(err));
}
function row(cells) { return '<tr>' + cells.map(c => `<td>${c}</td>`).join('') + '</tr>'; }
function loadDaily() {
  fetch('/api/expenses').then(r => r.json()).then(list => {
    document.getElementById('expenses').innerHTML = list.map(e => row([
      e.bankName, e.category, e.itemName, `<span class="${e.type.toLowerCase()}">${e.totalPrice}</span>`,
      e.paymentMode, `<button onclick="del('deleteExpense', ${e.id}, loadDaily)">x</button>`])).join('');
  });
  fetch('/api/summary').then(r => r.json()).then(s => {
    document.getElementById('total').textContent =
      `${s.conversion.base} ${s.grand_total.total} / ${s.conversion.target} ${s.converted_total}`;
  });
}
function loadAccounts() {
  fetch('/api/accounts').then(r => r.json()).then(list => {
    document.getElementById('accounts').innerHTML = list.map(a => row([
      a.accountHolder, a.beneficiaryName, `<span class="${a.type.toLowerCase()}">${a.amount}</span>`,
      a.paymentMode, `<button onclick="del('deleteAccount', ${a.id}, loadAccounts)">x</button>`])).join('');
  });
}
function del(route, id, done) { if (confirm('Delete?')) post('/api/' + route, { id: id }, done); }
function addBank() {
  post('/api/addBank', { bankName: v('b_name'), opCash: v('b_cash'), opCheque: v('b_chq'), opCard: v('b_card') }, loadDaily);
}
function addExpense() {
  post('/api/addExpense', {
    personName: v('d_name'), bankName: v('d_bank'), additionalInfo: v('d_info'), category: v('d_cat'),
    itemName: v('d_item'), quantity: v('d_qty'), unit: v('d_unit'), price: v('d_price'),
    type: v('d_type'), paymentMode: radio('d_mode') }, loadDaily);
}
function addAccount() {
  post('/api/addAccount', {
    holder: v('a_hold'), bank: v('a_bank'), accNum: v('a_anum'), benName: v('a_ben'), toBank: v('a_tbank'),
    toAccNum: v('a_tnum'), amount: v('a_amt'), type: v('a_type'), paymentMode: radio('a_mode') }, loadAccounts);
}
function setCurrency() { post('/api/setCurrency', { base: v('base'), target: v('target') }, () => location.reload()); }
function download(type, screen) {
  const url = `/api/export?type=${type}&screen=${screen}`;
  fetch(url).then(r => { if (r.status === 204) alert('No data!'); else window.location.href = url; });
}
loadDaily(); loadAccounts();
</script>
</body>
</html>
"#;

fn options(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!("<option>{value}</option>"))
        .collect()
}

fn mode_radios(name: &str) -> String {
    ["Cash", "Cheque", "Card/UPI"]
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let checked = if i == 0 { " checked" } else { "" };
            format!(r#"<label><input type="radio" name="{name}" value="{mode}"{checked}>{mode}</label>"#)
        })
        .collect()
}

fn body() -> String {
    let currencies = options(&AVAILABLE_CURRENCIES);
    let categories = options(&DEFAULT_CATEGORIES);
    let units = options(&["NOT APPLICABLE", "NOT AVAILABLE", "PIECE", "KG", "GRAM", "LITER", "ML"]);
    let directions = options(&["DEBIT", "CREDIT"]);
    format!(
        r#"<fieldset><legend>Currency</legend>
<select id="base">{currencies}</select> &rarr; <select id="target">{currencies}</select>
<button onclick="setCurrency()">Set</button>
</fieldset>
<fieldset><legend>Bank opening</legend>
<input id="b_name" placeholder="Bank name"><input id="b_cash" placeholder="Cash">
<input id="b_chq" placeholder="Cheque"><input id="b_card" placeholder="Card">
<button onclick="addBank()">Save</button>
</fieldset>
<fieldset><legend>Daily expense</legend>
<input id="d_name" placeholder="Person"><input id="d_bank" placeholder="Bank">
<select id="d_cat">{categories}</select><input id="d_item" placeholder="Item">
<input id="d_info" placeholder="Additional info"><input id="d_qty" placeholder="Qty">
<select id="d_unit">{units}</select><input id="d_price" placeholder="Price">
<select id="d_type">{directions}</select>{daily_modes}
<button onclick="addExpense()">Add</button>
<table><tbody id="expenses"></tbody></table>
<p>Grand total: <b id="total"></b></p>
<button onclick="download('csv', 'daily')">CSV</button><button onclick="download('pdf', 'daily')">PDF</button>
</fieldset>
<fieldset><legend>Account transactions</legend>
<input id="a_hold" placeholder="Holder"><input id="a_bank" placeholder="Bank"><input id="a_anum" placeholder="Acc no">
<input id="a_ben" placeholder="Beneficiary"><input id="a_tbank" placeholder="To bank"><input id="a_tnum" placeholder="To acc no">
<input id="a_amt" placeholder="Amount"><select id="a_type">{directions}</select>{account_modes}
<button onclick="addAccount()">Add</button>
<table><tbody id="accounts"></tbody></table>
<button onclick="download('csv', 'acc')">CSV</button><button onclick="download('pdf', 'acc')">PDF</button>
</fieldset>
<fieldset><legend>History (this month)</legend>
<button onclick="download('csv', 'hist')">CSV</button><button onclick="download('pdf', 'hist')">PDF</button>
</fieldset>
"#,
        daily_modes = mode_radios("d_mode"),
        account_modes = mode_radios("a_mode"),
    )
}

pub async fn index() -> Html<String> {
    Html(format!("{HEAD}{}{SCRIPT}", body()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn page_lists_every_currency() {
        let Html(page) = index().await;
        for code in AVAILABLE_CURRENCIES {
            assert!(page.contains(&format!("<option>{code}</option>")));
        }
        assert!(page.contains("/api/addExpense"));
    }
}
