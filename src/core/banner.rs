pub const INTRO: &[&str] = &[
    r".~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~. ",
    r"                                                                      ",
    r" .d888b.   .o888b.   db  .d888b.  d8888b. d88888b d8888b.  .d88b.     ",
    r".8P   Y8. d8P   Y8   88 .8P   Y8. 88  `8D 88'     88  `8D .8',, `8    ",
    r"88     88 8P     oooo88 88     88 88oooY' 88oooo  88oobY' 8. ||  `8   ",
    r"88     88 8b     ~~~~88 88     88 88~~~b. 88~~~~  88`8b   8. ||// 8   ",
    r"`8b   d8' Y8b   d8   88 `8b   d8' 88   8D 88.     88 `88. `8 || d'    ",
    r" `Y888P'   `Y888P'   YP  `Y888P'  Y8888P' Y88888P 88   YD  `.88P'     ",
    r"                                                                      ",
    r"`=========================== INSTALLATION ==========================' ",
    r"",
];

pub const OUTRO: &[&str] = &[
    r".~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~.",
    r"                ,@@@@@@@,                  ",
    r"        ,,,.   ,@@@@@@/@@,  .oo8888o.      ",
    r"     ,&%%&%&&%,@@@@@/@@@@@@,8888\88/8o     ",
    r"    ,%&\%&&%&&%,@@@\@@@/@@@88\88888/88'    ",
    r"    %&&%&%&/%&&%@@\@@/ /@@@88888\88888'    ",
    r"    %&&%/ %&%%&&@@\ V /@@' `88\8 `/88'     ",
    r"    `&%\ ` /%&'    |.|        \ '|8'       ",
    r"        |o|        | |         | |         ",
    r"        |.|        | |         | |         ",
    r"`========= INSTALLATION COMPLETE ========='",
    r"",
];

pub const OR_SEPARATOR: &str = "-- OR --";
