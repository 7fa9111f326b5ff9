//! Built-in word lists.
//!
//! A host editor supplies its own keyword lists through the colorize entry
//! points; the CLI uses this practical subset so it is useful out of the
//! box. Property names are lowercase, which is what the classifier probes
//! with.

use crate::wordlist::WordList;

const CSS1_PROPERTIES: &str = "\
background background-attachment background-color background-image \
background-position background-repeat border border-bottom border-color \
border-left border-right border-style border-top border-width clear color \
display float font font-family font-size font-style font-variant \
font-weight height letter-spacing line-height list-style list-style-image \
list-style-position list-style-type margin margin-bottom margin-left \
margin-right margin-top padding padding-bottom padding-left padding-right \
padding-top text-align text-decoration text-indent text-transform \
vertical-align white-space width word-spacing";

const CSS2_PROPERTIES: &str = "\
border-collapse border-spacing bottom caption-side clip content \
counter-increment counter-reset cursor direction empty-cells left \
max-height max-width min-height min-width outline outline-color \
outline-style outline-width overflow page-break-after page-break-before \
page-break-inside position quotes right table-layout top unicode-bidi \
visibility z-index";

const CSS3_PROPERTIES: &str = "\
align-content align-items align-self animation animation-delay \
animation-duration animation-name backdrop-filter border-radius box-shadow \
box-sizing column-gap filter flex flex-basis flex-direction flex-grow \
flex-shrink flex-wrap gap grid grid-area grid-template-columns \
grid-template-rows justify-content opacity order resize row-gap \
text-overflow transform transform-origin transition transition-delay \
transition-duration transition-property transition-timing-function \
word-break word-wrap";

const PSEUDO_CLASSES: &str = "\
active checked disabled empty enabled first-child first-of-type focus \
hover lang last-child last-of-type link not nth-child nth-of-type \
only-child root target visited";

const PSEUDO_ELEMENTS: &str = "after backdrop before first-letter first-line marker selection";

const EXTENDED_PROPERTIES: &str = "\
-moz-border-radius -moz-box-shadow -moz-opacity -moz-user-select \
-ms-filter -o-transition -webkit-appearance -webkit-border-radius \
-webkit-box-shadow -webkit-transform -webkit-transition \
-webkit-user-select zoom";

const EXTENDED_PSEUDO_CLASSES: &str =
    "-moz-any -moz-focusring -moz-placeholder -webkit-any -webkit-autofill";

const EXTENDED_PSEUDO_ELEMENTS: &str = "\
-moz-placeholder -moz-selection -ms-clear -webkit-input-placeholder \
-webkit-scrollbar -webkit-scrollbar-thumb";

const TCL_KEYWORDS: &str = "\
after append array binary break case catch cd clock close concat continue \
dict else elseif encoding eof error eval exec exit expr fblocked \
fconfigure fcopy file fileevent flush for foreach format gets glob global \
if incr info interp join lappend lassign lindex linsert list llength lmap \
lrange lrepeat lreplace lreverse lsearch lset lsort namespace open package \
pid proc puts pwd read regexp regsub rename return scan seek set socket \
source split string subst switch tell time trace unset update uplevel \
upvar variable vwait while";

/// The eight CSS lists in host slot order.
#[must_use]
pub fn css_word_lists() -> [WordList; 8] {
    [
        WordList::from_space_separated(CSS1_PROPERTIES),
        WordList::from_space_separated(PSEUDO_CLASSES),
        WordList::from_space_separated(CSS2_PROPERTIES),
        WordList::from_space_separated(CSS3_PROPERTIES),
        WordList::from_space_separated(PSEUDO_ELEMENTS),
        WordList::from_space_separated(EXTENDED_PROPERTIES),
        WordList::from_space_separated(EXTENDED_PSEUDO_CLASSES),
        WordList::from_space_separated(EXTENDED_PSEUDO_ELEMENTS),
    ]
}

#[must_use]
pub fn tcl_keywords() -> WordList {
    WordList::from_space_separated(TCL_KEYWORDS)
}
