//! Page-side JavaScript, invoked through `PageSession::call_function`.
//!
//! Class names (`si-…`, `f1i-close`) and button labels are the ones the
//! F1 Fantasy team page renders.

/// Truthy once the lineup or the budget widget has rendered.
pub(crate) const TEAM_READY: &str = r#"
(() => !!document.querySelector('div.si-formation__container img[alt]')
    || (!!document.body && (document.body.innerText || '').includes('Cost Cap')))()
"#;

pub(crate) const BODY_TEXT: &str = "document.body ? (document.body.innerText || '') : ''";

pub(crate) const PAGE_HTML: &str = "document.documentElement.outerHTML";

/// Click the tab link whose text equals `label` (case-insensitive).
pub(crate) const CLICK_TAB: &str = r#"
(label) => {
  const a = [...document.querySelectorAll('a')]
    .find(x => (x.textContent || '').trim().toLowerCase() === label);
  if (!a) return false;
  a.scrollIntoView({block: 'center'});
  a.click();
  return true;
}
"#;

/// Distinct image `alt` names of the selected lineup, in page order.
///
/// Falls back to the main row when the lineup panel yields fewer than five
/// names, stopping at the first name of the full player list.
pub(crate) const SELECTED_NAMES: &str = r#"
(listHead) => {
  const uniq = (alts) => {
    const seen = new Set();
    const out = [];
    for (const a of alts) {
      const k = a.toLowerCase();
      if (seen.has(k)) continue;
      seen.add(k);
      out.push(a);
    }
    return out;
  };
  const altsOf = (root) => root
    ? [...root.querySelectorAll('img[alt]')]
        .map(i => (i.getAttribute('alt') || '').trim())
        .filter(Boolean)
    : [];

  const preferred = uniq(altsOf(document.querySelector('div.si-cmo__container-lhs')));
  if (preferred.length >= 5) return preferred;

  const stop = new Set(listHead.map(s => s.toLowerCase()));
  const root = document.querySelector('.si-main__row') || document.body;
  const alts = [];
  for (const alt of altsOf(root)) {
    const k = alt.toLowerCase();
    if (stop.has(k)) break;
    if (k === 'australia' || k === 'melbourne' || k.includes('formula 1') || k.includes('f1 fantasy')) continue;
    alts.push(alt);
  }
  return uniq(alts);
}
"#;

/// Name on the card carrying the `2x` badge, or null.
pub(crate) const BOOST_BADGE: &str = r#"
() => {
  const badge = [...document.querySelectorAll('body *')]
    .find(el => el.children.length === 0 && (el.textContent || '').trim().toLowerCase() === '2x');
  if (!badge) return null;
  const card = badge.closest('li');
  const img = card && card.querySelector('img[alt]');
  return img ? (img.getAttribute('alt') || null) : null;
}
"#;

/// Whether a card named `name` is in the selected lineup.
pub(crate) const IN_LINEUP: &str = r#"
(name) => {
  const cont = document.querySelector('div.si-formation__container');
  if (!cont) return false;
  return [...cont.querySelectorAll('img[alt]')].some(i => i.getAttribute('alt') === name);
}
"#;

/// Click the close button on the lineup card named `name`.
pub(crate) const REMOVE_FROM_LINEUP: &str = r#"
(name) => {
  const cont = document.querySelector('div.si-formation__container');
  if (!cont) return {ok: false, err: 'lineup container not found'};
  const img = [...cont.querySelectorAll('img[alt]')].find(i => i.getAttribute('alt') === name);
  if (!img) return {ok: false, err: 'card not in lineup'};
  const card = img.closest('li');
  if (!card) return {ok: false, err: 'card element not found'};
  const close = card.querySelector('button i.f1i-close');
  const buttons = [...card.querySelectorAll('button')];
  const btn = close ? close.closest('button') : buttons[buttons.length - 1];
  if (!btn) return {ok: false, err: 'no remove button'};
  btn.scrollIntoView({block: 'center'});
  btn.click();
  return {ok: true};
}
"#;

/// Focus and tag the search box labelled `label`, clearing its value.
pub(crate) const PREPARE_SEARCH: &str = r#"
(label) => {
  const inp = document.querySelector(`input[aria-label="${label}"]`)
    || document.querySelector('input[placeholder*="Search" i]');
  if (!inp) return false;
  document.querySelectorAll('[data-f1sync-search]').forEach(e => e.removeAttribute('data-f1sync-search'));
  inp.setAttribute('data-f1sync-search', '1');
  inp.scrollIntoView({block: 'center'});
  const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
  setter.call(inp, '');
  inp.dispatchEvent(new Event('input', {bubbles: true}));
  inp.focus();
  return true;
}
"#;

pub(crate) const SEARCH_INPUT: &str = "input[data-f1sync-search]";

/// Empty the tagged search box.
pub(crate) const CLEAR_SEARCH: &str = r#"
() => {
  const inp = document.querySelector('input[data-f1sync-search]');
  if (!inp) return false;
  const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
  setter.call(inp, '');
  inp.dispatchEvent(new Event('input', {bubbles: true}));
  return true;
}
"#;

/// Find the selectable list row named `name` and report its add button.
///
/// Clicks the button when `click` is set and it is enabled. Scrolls the
/// window by `scroll` pixels when no usable row is visible yet.
pub(crate) const PROBE_ADD_ROW: &str = r#"
(name, click, scroll) => {
  const rows = [...document.querySelectorAll('li')].filter(li => {
    const img = li.querySelector('img[alt]');
    if (!img || (img.getAttribute('alt') || '') !== name) return false;
    return !li.querySelector('i.f1i-close') && !!li.querySelector('button.si-btn__primary-dark');
  });
  if (!rows.length) {
    if (scroll) window.scrollBy(0, scroll);
    return {ok: false, err: 'no available row with add button'};
  }
  const row = rows[rows.length - 1];
  row.scrollIntoView({block: 'center'});
  const btn = row.querySelector('button.si-btn__primary-dark');
  const cls = (btn.className || '').toString();
  const disabled = !!btn.disabled || cls.includes('si-disabled');
  if (disabled) {
    if (scroll) window.scrollBy(0, scroll);
    return {ok: true, disabled: true, err: 'add button disabled'};
  }
  if (click) btn.click();
  return {ok: true, disabled: false, clicked: !!click};
}
"#;

/// Open the detail card of the lineup driver named `name`.
pub(crate) const OPEN_LINEUP_CARD: &str = r#"
(name) => {
  const cont = document.querySelector('div.si-formation__container');
  if (!cont) return false;
  const img = [...cont.querySelectorAll('img[alt]')].find(i => i.getAttribute('alt') === name);
  if (!img) return false;
  const target = img.closest('button') || img;
  target.scrollIntoView({block: 'center'});
  target.click();
  return true;
}
"#;

/// Click the first button whose text contains `text`.
pub(crate) const CLICK_BUTTON: &str = r#"
(text) => {
  const btn = [...document.querySelectorAll('button')]
    .find(b => (b.textContent || '').includes(text));
  if (!btn) return false;
  btn.click();
  return true;
}
"#;

/// Tag the first button whose text contains `text` with `marker` so it can be
/// clicked with real mouse events.
pub(crate) const MARK_BUTTON: &str = r#"
(text, marker) => {
  const btn = [...document.querySelectorAll('button')]
    .find(b => (b.textContent || '').includes(text));
  if (!btn) return {found: false, disabled: false};
  btn.setAttribute('data-f1sync-target', marker);
  btn.scrollIntoView({block: 'center'});
  const cls = (btn.className || '').toString();
  return {found: true, disabled: !!btn.disabled || cls.includes('si-disabled')};
}
"#;

pub(crate) const TEXT_PRESENT: &str = r#"
(text) => !!document.body && (document.body.innerText || '').includes(text)
"#;

/// Text of the section holding the "Cost Cap" label.
pub(crate) const COST_CAP_SECTION: &str = r#"
() => {
  const label = [...document.querySelectorAll('body *')]
    .find(el => el.children.length === 0 && (el.textContent || '').includes('Cost Cap'));
  if (!label) return null;
  const section = label.closest('section') || label.parentElement;
  return section ? (section.innerText || '') : null;
}
"#;

/// Visible text of the lineup container, or the whole body.
pub(crate) const FORMATION_TEXT: &str = r#"
() => {
  const cont = document.querySelector('div.si-formation__container') || document.body;
  return cont ? (cont.innerText || '') : '';
}
"#;
